//! Application configuration

use std::path::PathBuf;

use cloud_speech::SpeechConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Speech engine configuration
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Live bridge configuration
    #[serde(default)]
    pub live: LiveConfig,

    /// Directory for spooled uploads (defaults to the OS temp dir)
    #[serde(default)]
    pub spool_dir: Option<PathBuf>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Graceful shutdown timeout in seconds
    #[serde(default)]
    pub shutdown_timeout_secs: Option<u64>,
}

/// Live transcription bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    /// Whether an engine error event tears the session down. The engine
    /// error is advisory by default; the client decides what to do with it.
    #[serde(default)]
    pub close_session_on_engine_error: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            shutdown_timeout_secs: Some(30),
        }
    }
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            close_session_on_engine_error: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) with
    /// `VOICEBRIDGE__`-prefixed environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a `config::ConfigError` when a present source cannot be
    /// read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("VOICEBRIDGE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Directory uploads are spooled into
    #[must_use]
    pub fn spool_dir(&self) -> PathBuf {
        self.spool_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 50 * 1024 * 1024);
        assert!(!config.live.close_session_on_engine_error);
        assert!(config.spool_dir.is_none());
    }

    #[test]
    fn spool_dir_falls_back_to_temp_dir() {
        let config = AppConfig::default();
        assert_eq!(config.spool_dir(), std::env::temp_dir());
    }

    #[test]
    fn spool_dir_prefers_configured_path() {
        let config = AppConfig {
            spool_dir: Some(PathBuf::from("/var/spool/voicebridge")),
            ..Default::default()
        };
        assert_eq!(config.spool_dir(), PathBuf::from("/var/spool/voicebridge"));
    }

    #[test]
    fn config_deserializes_nested_sections() {
        let json = serde_json::json!({
            "server": {"host": "0.0.0.0", "port": 8080},
            "speech": {"language_code": "en-GB"},
            "live": {"close_session_on_engine_error": true}
        });

        let config: AppConfig = serde_json::from_value(json).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.speech.language_code, "en-GB");
        assert!(config.live.close_session_on_engine_error);
    }
}
