use crate::config::{AppConfig, Backend, ConfigError};
use crate::emotion::{
    DisplayEmotion, IntensityLevel, LexiconSentimentAnalyzer, PolarityScores, SentimentClassifier,
    SentimentLabel,
};
use crate::output::{OutputError, OutputStore};
use crate::request::{SpeechRequest, SpeechRequestBuilder};
use crate::tts::{ElevenLabsTtsClient, EspeakTtsClient, TtsClient, TtsError};
use crate::voice::{
    BaseVoiceTable, CloudVoiceTuning, LookupError, TableError, VoiceParameters, VoiceTable,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_TARGET: &str = "engine";

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("no text provided")]
    EmptyInput,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read voice table {path}: {source}")]
    TableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid voice table: {0}")]
    Table(#[from] TableError),
    #[error("voice lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("speech synthesis failed: {0}")]
    Render(#[from] TtsError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result of one `speak` call.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SpeechOutcome {
    pub sentiment: SentimentLabel,
    pub emotion: DisplayEmotion,
    pub intensity: IntensityLevel,
    pub parameters: VoiceParameters,
    pub file_name: String,
    pub path: PathBuf,
}

/// Everything the engine derives from a text short of rendering it.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Analysis {
    pub text: String,
    pub sentiment: SentimentLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<PolarityScores>,
    pub emotion: DisplayEmotion,
    pub intensity: IntensityLevel,
    pub parameters: VoiceParameters,
    pub base_parameters: VoiceParameters,
    pub tuning: CloudVoiceTuning,
    pub markup: String,
}

/// Text in, audio file out.
///
/// Classifies the text, maps the sentiment to an emotion, builds a speech
/// request, hands it to the renderer chosen at startup and saves the result.
pub struct EmpathyEngine {
    classifier: Arc<dyn SentimentClassifier>,
    requests: SpeechRequestBuilder,
    renderer: Box<dyn TtsClient>,
    store: OutputStore,
    base: BaseVoiceTable,
}

impl EmpathyEngine {
    /// Fails if `table` cannot voice every emotion the sentiment policy produces.
    pub fn new(
        classifier: Arc<dyn SentimentClassifier>,
        table: Arc<VoiceTable>,
        backend: Backend,
        renderer: Box<dyn TtsClient>,
        store: OutputStore,
    ) -> Result<Self, EngineError> {
        table.ensure_covers(&DisplayEmotion::FROM_SENTIMENT)?;
        Ok(Self {
            classifier,
            requests: SpeechRequestBuilder::new(table, backend),
            renderer,
            store,
            base: BaseVoiceTable,
        })
    }

    /// Wires the lexicon classifier, the configured voice table and the
    /// renderer for `config.backend`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, EngineError> {
        let table = match &config.voice_table {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| EngineError::TableFile {
                        path: path.clone(),
                        source,
                    })?;
                VoiceTable::from_json_str(&json)?
            }
            None => VoiceTable::shared().clone(),
        };

        let renderer: Box<dyn TtsClient> = match config.backend {
            Backend::Cloud => {
                let key = config
                    .elevenlabs_api_key
                    .clone()
                    .ok_or(ConfigError::MissingApiKey)?;
                Box::new(ElevenLabsTtsClient::new(key, config.cloud.clone()))
            }
            Backend::Local => Box::new(EspeakTtsClient::new(config.local.clone())),
        };

        let store = OutputStore::new(&config.output_dir);
        store.ensure().await?;

        tracing::info!(
            target: LOG_TARGET,
            backend = %config.backend,
            output_dir = %config.output_dir.display(),
            "engine ready"
        );

        Self::new(
            Arc::new(LexiconSentimentAnalyzer::new()),
            Arc::new(table),
            config.backend,
            renderer,
            store,
        )
    }

    pub fn backend(&self) -> Backend {
        self.requests.backend()
    }

    pub fn output_dir(&self) -> &std::path::Path {
        self.store.dir()
    }

    /// Classifies `text` and builds the request `speak` would render.
    fn prepare(&self, text: &str) -> Result<(SentimentLabel, SpeechRequest), EngineError> {
        let sentiment = self.classifier.classify(text);
        let emotion = DisplayEmotion::from_sentiment(sentiment);
        let request = self.requests.build(text, emotion)?;
        Ok((sentiment, request))
    }

    pub fn analyze(&self, text: &str) -> Result<Analysis, EngineError> {
        let text = non_empty(text)?;
        let (sentiment, request) = self.prepare(text)?;

        Ok(Analysis {
            text: text.to_owned(),
            sentiment,
            scores: self.classifier.polarity(text),
            emotion: request.emotion,
            intensity: request.intensity,
            parameters: request.parameters,
            base_parameters: self.base.get(request.emotion),
            tuning: request.tuning,
            markup: request.markup,
        })
    }

    pub async fn speak(&self, text: &str) -> Result<SpeechOutcome, EngineError> {
        let text = non_empty(text)?;
        let (sentiment, request) = self.prepare(text)?;
        let emotion = request.emotion;

        tracing::info!(
            target: LOG_TARGET,
            %sentiment,
            %emotion,
            intensity = %request.intensity,
            rate = request.parameters.rate,
            volume = request.parameters.volume,
            pitch = %request.parameters.pitch,
            "rendering speech"
        );

        let intensity = request.intensity;
        let parameters = request.parameters;
        let file_name = request.suggested_filename.clone();

        let audio = self.renderer.synthesize(request).await?;
        let path = self.store.write(&file_name, &audio).await?;

        Ok(SpeechOutcome {
            sentiment,
            emotion,
            intensity,
            parameters,
            file_name,
            path,
        })
    }
}

fn non_empty(text: &str) -> Result<&str, EngineError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(EngineError::EmptyInput)
    } else {
        Ok(trimmed)
    }
}
