//! Configuration for the speech engine adapters

use serde::{Deserialize, Serialize};

/// Configuration for the cloud speech engines
///
/// The relay speaks to a single voice/locale profile; everything here has
/// a production default and is overridable from the application config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the synthesis service
    #[serde(default = "default_synthesis_base_url")]
    pub synthesis_base_url: String,

    /// Base URL of the batch recognition service
    #[serde(default = "default_recognition_base_url")]
    pub recognition_base_url: String,

    /// WebSocket URL of the streaming recognition service
    #[serde(default = "default_streaming_url")]
    pub streaming_url: String,

    /// Locale used for both synthesis and recognition
    #[serde(default = "default_language_code")]
    pub language_code: String,

    /// Synthesis voice gender
    #[serde(default = "default_voice_gender")]
    pub voice_gender: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_synthesis_base_url() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_recognition_base_url() -> String {
    "https://speech.googleapis.com".to_string()
}

fn default_streaming_url() -> String {
    "wss://speech.googleapis.com/v1/speech:streamingrecognize".to_string()
}

fn default_language_code() -> String {
    "en-US".to_string()
}

fn default_voice_gender() -> String {
    "FEMALE".to_string()
}

const fn default_timeout_ms() -> u64 {
    30000
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            synthesis_base_url: default_synthesis_base_url(),
            recognition_base_url: default_recognition_base_url(),
            streaming_url: default_streaming_url(),
            language_code: default_language_code(),
            voice_gender: default_voice_gender(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SpeechConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.synthesis_base_url.is_empty() {
            return Err("Synthesis base URL must not be empty".to_string());
        }

        if self.recognition_base_url.is_empty() {
            return Err("Recognition base URL must not be empty".to_string());
        }

        if self.streaming_url.is_empty() {
            return Err("Streaming URL must not be empty".to_string());
        }

        if self.language_code.is_empty() {
            return Err("Language code must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
