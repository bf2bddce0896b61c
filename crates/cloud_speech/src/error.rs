//! Speech processing errors

use thiserror::Error;

/// Errors that can occur while relaying to the speech engines
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Failed to connect to a speech service
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to a speech service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Speech synthesis failed
    #[error("Synthesis failed: {0}")]
    Synthesis(String),

    /// Batch recognition failed
    #[error("Recognition failed: {0}")]
    Recognition(String),

    /// Streaming recognition channel failed
    #[error("Streaming recognition failed: {0}")]
    Streaming(String),

    /// Audio transcoding failed
    #[error("Transcoding failed: {0}")]
    Transcode(String),

    /// Document has an extension no extraction adapter handles
    #[error("unsupported file type: {extension}")]
    UnsupportedDocument {
        /// Declared extension of the rejected document
        extension: String,
    },

    /// Document text extraction failed
    #[error("Text extraction failed: {0}")]
    DocumentExtraction(String),

    /// Invalid response from a service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Timeout during processing
    #[error("Speech processing timeout after {0}ms")]
    Timeout(u64),

    /// Credentials artifact missing or unreadable
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for SpeechError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(30000)
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}
