use crate::config::LocalConfig;
use crate::request::SpeechRequest;
use crate::tts::{AudioFormat, TtsAudio, TtsClient, TtsError};
use crate::voice::{Pitch, VoiceParameters};
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::io::Cursor;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const LOG_TARGET: &str = "tts::espeak";

/// Offline renderer driving an espeak-ng compatible binary.
///
/// Rate and volume map straight onto `-s` and `-a`. Pitch has no direct
/// control here, so it picks between the configured voices instead.
#[derive(Clone, Debug)]
pub struct EspeakTtsClient {
    binary: PathBuf,
    voices: Vec<String>,
}

impl EspeakTtsClient {
    #[must_use]
    pub fn new(config: LocalConfig) -> Self {
        Self {
            binary: config.binary,
            voices: config.voices,
        }
    }

    fn args(&self, parameters: &VoiceParameters) -> Vec<String> {
        let amplitude = (parameters.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        let mut args = vec![
            "-m".to_owned(),
            "-s".to_owned(),
            parameters.rate.to_string(),
            "-a".to_owned(),
            amplitude.to_string(),
        ];
        if let Some(voice) = select_voice(parameters.pitch, &self.voices) {
            args.push("-v".to_owned());
            args.push(voice.to_owned());
        }
        args.push("--stdin".to_owned());
        args.push("--stdout".to_owned());
        args
    }
}

/// High pitches take the second voice, low pitches the first, anything in
/// between keeps the synthesizer default. Needs at least two voices.
pub fn select_voice(pitch: Pitch, voices: &[String]) -> Option<&str> {
    if voices.len() < 2 {
        return None;
    }
    match pitch {
        Pitch::High | Pitch::VeryHigh => Some(voices[1].as_str()),
        Pitch::Low | Pitch::VeryLow => Some(voices[0].as_str()),
        Pitch::MediumLow | Pitch::Medium | Pitch::MediumHigh => None,
    }
}

impl TtsClient for EspeakTtsClient {
    fn synthesize(&self, request: SpeechRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>> {
        let binary = self.binary.clone();
        let args = self.args(&request.parameters);
        let text = request.markup;

        async move {
            tracing::debug!(target: LOG_TARGET, binary = %binary.display(), ?args, "spawning synthesizer");

            let mut child = Command::new(&binary)
                .args(&args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| {
                    let path = binary.display();
                    TtsError::Process(format!("failed to spawn {path}: {e}"))
                })?;

            {
                let stdin = child
                    .stdin
                    .as_mut()
                    .ok_or_else(|| TtsError::Process("failed to open synthesizer stdin".into()))?;
                stdin
                    .write_all(text.as_bytes())
                    .await
                    .map_err(|e| TtsError::Process(format!("stdin write failed: {e}")))?;
            }
            child.stdin.take();

            let output = child
                .wait_with_output()
                .await
                .map_err(|e| TtsError::Process(format!("synthesizer did not finish: {e}")))?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let status = output.status;
                return Err(TtsError::Process(format!(
                    "synthesizer exited with {status}: {}",
                    stderr.trim()
                )));
            }

            if output.stdout.is_empty() {
                return Err(TtsError::InvalidAudio("synthesizer produced no audio".into()));
            }

            let spec = hound::WavReader::new(Cursor::new(output.stdout.as_slice()))
                .map_err(|e| TtsError::InvalidAudio(format!("not a WAV stream: {e}")))?
                .spec();

            Ok(TtsAudio {
                format: AudioFormat::Wav,
                bytes: Bytes::from(output.stdout),
                sample_rate_hz: Some(spec.sample_rate),
                channels: Some(spec.channels),
            })
        }
        .boxed()
    }
}
