use crate::defaults;
use crate::error::{Result, VoiceOrderError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub speech: SpeechConfig,
    pub auth: AuthConfig,
}

/// Order backend configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub order_path: String,
    pub feedback_path: String,
    /// Sent with every order when set; the backend keys its order context on it.
    pub user_id: Option<String>,
    /// Request timeout in milliseconds. `None` keeps the HTTP client's own
    /// default.
    pub timeout_ms: Option<u64>,
}

/// Speech capture and playback configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    pub preferred_voice: Option<String>,
    pub pitch: f32,
    pub rate: f32,
    pub language: String,
    pub capture_timeout_ms: u64,
    /// External speech-to-text command; capture is unavailable without one.
    pub recognizer_command: Option<Vec<String>>,
    pub synthesizer: SynthesizerKind,
}

/// Synthesizer backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SynthesizerKind {
    EspeakNg,
    None,
}

/// Local authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub allow_anonymous: bool,
    /// email → password
    pub accounts: BTreeMap<String, String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::API_BASE_URL.to_string(),
            order_path: defaults::ORDER_PATH.to_string(),
            feedback_path: defaults::FEEDBACK_PATH.to_string(),
            user_id: None,
            timeout_ms: None,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            preferred_voice: None,
            pitch: defaults::PITCH,
            rate: defaults::RATE,
            language: defaults::LANGUAGE.to_string(),
            capture_timeout_ms: defaults::CAPTURE_TIMEOUT_MS,
            recognizer_command: None,
            synthesizer: SynthesizerKind::EspeakNg,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allow_anonymous: true,
            accounts: BTreeMap::new(),
        }
    }
}

impl ApiConfig {
    /// Full URL of the voice order endpoint.
    pub fn order_url(&self) -> String {
        join_url(&self.base_url, &self.order_path)
    }

    /// Full URL of the feedback endpoint.
    pub fn feedback_url(&self) -> String {
        join_url(&self.base_url, &self.feedback_path)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML or out-of-range values.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(VoiceOrderError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "api.base_url".to_string(),
                message: format!("must start with http:// or https://, got {}", self.api.base_url),
            });
        }

        if !(self.speech.pitch > 0.0 && self.speech.pitch <= 2.0) {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "speech.pitch".to_string(),
                message: "must be in (0, 2]".to_string(),
            });
        }

        if !(0.1..=10.0).contains(&self.speech.rate) {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "speech.rate".to_string(),
                message: "must be in [0.1, 10]".to_string(),
            });
        }

        if self.api.timeout_ms == Some(0) {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "api.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.speech.capture_timeout_ms == 0 {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "speech.capture_timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if let Some(command) = &self.speech.recognizer_command
            && command.is_empty()
        {
            return Err(VoiceOrderError::ConfigInvalidValue {
                key: "speech.recognizer_command".to_string(),
                message: "must name a program".to_string(),
            });
        }

        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOICE_ORDER_API_URL → api.base_url
    /// - VOICE_ORDER_VOICE → speech.preferred_voice
    /// - VOICE_ORDER_USER_ID → api.user_id
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("VOICE_ORDER_API_URL")
            && !url.is_empty()
        {
            self.api.base_url = url;
        }

        if let Ok(voice) = std::env::var("VOICE_ORDER_VOICE")
            && !voice.is_empty()
        {
            self.speech.preferred_voice = Some(voice);
        }

        if let Ok(user_id) = std::env::var("VOICE_ORDER_USER_ID")
            && !user_id.is_empty()
        {
            self.api.user_id = Some(user_id);
        }

        self
    }

    /// Apply environment variables, then a request timeout given on the
    /// command line, and check the result.
    pub fn with_overrides(self, timeout: Option<Duration>) -> Result<Self> {
        let mut config = self.with_env_overrides();
        if let Some(timeout) = timeout {
            config.api.timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        }
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voice-order/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("voice-order")
            .join("config.toml")
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| VoiceOrderError::ConfigParse {
            message: e.to_string(),
        })
    }
}
