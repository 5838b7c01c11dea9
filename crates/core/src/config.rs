use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_OUTPUT_DIR: &str = "static/output";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "EXAVITQu4vr4xnSDxMaL";
pub const DEFAULT_ELEVENLABS_MODEL_ID: &str = "eleven_turbo_v2_5";
pub const DEFAULT_ESPEAK_BINARY: &str = "espeak-ng";
pub const DEFAULT_LOCAL_VOICES: [&str; 2] = ["en+m3", "en+f3"];
pub const ENV_ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";
pub const ENV_ELEVENLABS_VOICE_ID: &str = "ELEVENLABS_VOICE_ID";
pub const ENV_EMPATHY_BACKEND: &str = "EMPATHY_BACKEND";
pub const ENV_EMPATHY_OUTPUT_DIR: &str = "EMPATHY_OUTPUT_DIR";
pub const ENV_ESPEAK_BINARY: &str = "ESPEAK_BINARY";

/// Which renderer turns requests into audio. Chosen once at startup.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Offline synthesizer, writes WAV.
    Local,
    /// ElevenLabs text-to-speech, writes MP3.
    Cloud,
}

impl Backend {
    /// Explicit choice wins; otherwise the presence of a cloud key decides.
    pub fn resolve(explicit: Option<Backend>, api_key: Option<&ApiKey>) -> Result<Self, ConfigError> {
        match (explicit, api_key) {
            (Some(Backend::Cloud), None) => Err(ConfigError::MissingApiKey),
            (Some(backend), _) => Ok(backend),
            (None, Some(_)) => Ok(Backend::Cloud),
            (None, None) => Ok(Backend::Local),
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Local => "wav",
            Self::Cloud => "mp3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cloud => "cloud",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "cloud" => Ok(Self::Cloud),
            other => Err(ConfigError::UnknownBackend(other.to_owned())),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudConfig {
    pub base_url: String,
    pub voice_id: String,
    pub model_id: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ELEVENLABS_BASE_URL.to_owned(),
            voice_id: DEFAULT_ELEVENLABS_VOICE_ID.to_owned(),
            model_id: DEFAULT_ELEVENLABS_MODEL_ID.to_owned(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalConfig {
    pub binary: PathBuf,
    /// Ordered low-to-high; pitch picks between the first two.
    pub voices: Vec<String>,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_ESPEAK_BINARY),
            voices: DEFAULT_LOCAL_VOICES.iter().map(|v| (*v).to_owned()).collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: Backend,
    pub elevenlabs_api_key: Option<ApiKey>,
    pub cloud: CloudConfig,
    pub local: LocalConfig,
    pub output_dir: PathBuf,
    pub bind_addr: String,
    pub voice_table: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            elevenlabs_api_key: None,
            cloud: CloudConfig::default(),
            local: LocalConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            voice_table: None,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("api key must not be empty")]
    EmptyApiKey,
    #[error("cloud backend requires {ENV_ELEVENLABS_API_KEY}")]
    MissingApiKey,
    #[error("unknown backend {0:?}, expected local or cloud")]
    UnknownBackend(String),
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    match cli_value {
        Some(v) => Ok(Some(ApiKey::new(v)?)),
        None => match env.var(env_key) {
            Some(v) => Ok(Some(ApiKey::new(v)?)),
            None => Ok(None),
        },
    }
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

pub fn resolve_backend(
    cli_value: Option<String>,
    env: &impl Env,
    api_key: Option<&ApiKey>,
) -> Result<Backend, ConfigError> {
    let explicit = match cli_value.or_else(|| env.var(ENV_EMPATHY_BACKEND)) {
        Some(v) => Some(v.parse::<Backend>()?),
        None => None,
    };
    Backend::resolve(explicit, api_key)
}
