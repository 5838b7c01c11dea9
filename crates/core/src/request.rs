use crate::config::Backend;
use crate::emotion::{estimate_intensity, DisplayEmotion, IntensityLevel};
use crate::markup::normalize_markup;
use crate::voice::{CloudVoiceTuning, LookupError, VoiceParameters, VoiceTable};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Everything a renderer needs to produce one audio file.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SpeechRequest {
    /// SSML document handed to the synthesizer as its text payload.
    pub markup: String,
    pub emotion: DisplayEmotion,
    pub intensity: IntensityLevel,
    pub parameters: VoiceParameters,
    pub tuning: CloudVoiceTuning,
    pub suggested_filename: String,
}

/// `output_<emotion>_<intensity>_<unix seconds>.<ext>`
pub fn suggested_filename(
    emotion: DisplayEmotion,
    intensity: IntensityLevel,
    timestamp: u64,
    backend: Backend,
) -> String {
    format!(
        "output_{emotion}_{intensity}_{timestamp}.{}",
        backend.file_extension()
    )
}

/// Builds [`SpeechRequest`]s against one voice table for one backend.
///
/// Pure: no I/O beyond reading the wall clock for the file name.
#[derive(Clone, Debug)]
pub struct SpeechRequestBuilder {
    table: Arc<VoiceTable>,
    backend: Backend,
}

impl SpeechRequestBuilder {
    pub fn new(table: Arc<VoiceTable>, backend: Backend) -> Self {
        Self { table, backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn table(&self) -> &VoiceTable {
        &self.table
    }

    pub fn build(&self, text: &str, emotion: DisplayEmotion) -> Result<SpeechRequest, LookupError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.build_at(text, emotion, now)
    }

    pub fn build_at(
        &self,
        text: &str,
        emotion: DisplayEmotion,
        timestamp: u64,
    ) -> Result<SpeechRequest, LookupError> {
        let intensity = estimate_intensity(text);
        let parameters = self.table.resolve(emotion, intensity)?;
        let markup = normalize_markup(text);
        let tuning = CloudVoiceTuning::for_intensity(intensity);

        Ok(SpeechRequest {
            markup,
            emotion,
            intensity,
            parameters,
            tuning,
            suggested_filename: suggested_filename(emotion, intensity, timestamp, self.backend),
        })
    }
}
