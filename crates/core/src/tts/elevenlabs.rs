use crate::config::{ApiKey, CloudConfig};
use crate::request::SpeechRequest;
use crate::tts::{AudioFormat, TtsAudio, TtsClient, TtsError};
use crate::util::{retry_with_backoff, RetryConfig};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::Serialize;

const LOG_TARGET: &str = "tts::elevenlabs";

#[derive(Clone)]
pub struct ElevenLabsTtsClient {
    client: Client,
    api_key: ApiKey,
    config: CloudConfig,
    retry: RetryConfig,
}

impl ElevenLabsTtsClient {
    pub fn new(api_key: ApiKey, config: CloudConfig) -> Self {
        Self {
            client: Client::new(),
            api_key,
            config,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.voice_id
        )
    }

    async fn post_once(&self, url: &str, body: &ElevenLabsRequest<'_>) -> Result<TtsAudio, TtsError> {
        let response = self
            .client
            .post(url)
            .header("xi-api-key", self.api_key.expose())
            .header("Accept", "audio/mpeg")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(TtsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(TtsError::InvalidAudio("empty response body".into()));
        }

        Ok(TtsAudio {
            format: AudioFormat::Mp3,
            bytes,
            sample_rate_hz: None,
            channels: None,
        })
    }
}

#[derive(Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f64,
    similarity_boost: f64,
}

impl TtsClient for ElevenLabsTtsClient {
    fn synthesize(&self, request: SpeechRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>> {
        async move {
            let url = self.endpoint();
            let body = ElevenLabsRequest {
                text: &request.markup,
                model_id: &self.config.model_id,
                voice_settings: VoiceSettings {
                    stability: request.tuning.stability,
                    similarity_boost: request.tuning.similarity_boost,
                },
            };

            tracing::debug!(
                target: LOG_TARGET,
                emotion = %request.emotion,
                intensity = %request.intensity,
                stability = body.voice_settings.stability,
                similarity_boost = body.voice_settings.similarity_boost,
                "requesting cloud synthesis"
            );

            retry_with_backoff(&self.retry, || self.post_once(&url, &body), TtsError::is_retryable).await
        }
        .boxed()
    }
}
