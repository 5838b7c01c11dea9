mod elevenlabs;
mod espeak;

use crate::config::Backend;
use crate::request::SpeechRequest;
use crate::util::is_http_retryable;
use bytes::Bytes;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub use elevenlabs::ElevenLabsTtsClient;
pub use espeak::{select_voice, EspeakTtsClient};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn for_backend(backend: Backend) -> Self {
        match backend {
            Backend::Cloud => Self::Mp3,
            Backend::Local => Self::Wav,
        }
    }
}

/// Encoded audio as returned by a renderer, ready to be written to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct TtsAudio {
    pub format: AudioFormat,
    pub bytes: Bytes,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u16>,
}

#[derive(thiserror::Error, Debug)]
pub enum TtsError {
    #[error("tts request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("tts api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("local synthesizer failed: {0}")]
    Process(String),
    #[error("synthesizer returned unusable audio: {0}")]
    InvalidAudio(String),
}

impl TtsError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => is_http_retryable(*status),
            Self::Process(_) | Self::InvalidAudio(_) => false,
        }
    }
}

/// Renders a [`SpeechRequest`] to encoded audio.
pub trait TtsClient: Send + Sync {
    fn synthesize(&self, request: SpeechRequest) -> BoxFuture<'_, Result<TtsAudio, TtsError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_retry_only_on_transient_statuses() {
        let err = TtsError::Api {
            status: 503,
            body: String::new(),
        };
        assert!(err.is_retryable());
        let err = TtsError::Api {
            status: 401,
            body: "invalid key".into(),
        };
        assert!(!err.is_retryable());
        assert!(!TtsError::Process("boom".into()).is_retryable());
    }

    #[test]
    fn format_follows_backend() {
        assert_eq!(AudioFormat::for_backend(Backend::Cloud), AudioFormat::Mp3);
        assert_eq!(AudioFormat::for_backend(Backend::Local), AudioFormat::Wav);
    }
}
