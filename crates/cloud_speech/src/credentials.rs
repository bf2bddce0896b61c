//! Engine credential loading
//!
//! The credential artifact is a JSON file at a fixed location, read once
//! before the server starts accepting connections. Its absence is fatal:
//! the process must not come up without it. After loading, the credentials
//! are immutable and shared by `Arc` into every engine client.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

/// Environment variable naming the credentials artifact
pub const CREDENTIALS_PATH_ENV: &str = "SPEECH_CREDENTIALS";

/// Default credentials location when the environment variable is unset
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

use crate::error::SpeechError;

/// Immutable engine credentials, loaded once at startup
#[derive(Clone, Deserialize)]
pub struct Credentials {
    api_key: String,
    #[serde(default)]
    project_id: Option<String>,
}

impl Credentials {
    /// Load credentials from a JSON artifact
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Credentials` if the file is missing,
    /// unreadable, or not valid JSON with an `api_key` field.
    pub fn load(path: &Path) -> Result<Self, SpeechError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SpeechError::Credentials(format!(
                "cannot read credentials file {}: {e}",
                path.display()
            ))
        })?;

        let credentials: Self = serde_json::from_str(&raw).map_err(|e| {
            SpeechError::Credentials(format!(
                "cannot parse credentials file {}: {e}",
                path.display()
            ))
        })?;

        if credentials.api_key.trim().is_empty() {
            return Err(SpeechError::Credentials(format!(
                "credentials file {} has an empty api_key",
                path.display()
            )));
        }

        Ok(credentials)
    }

    /// Load credentials from the fixed location (`SPEECH_CREDENTIALS`, or
    /// `credentials.json` in the working directory).
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Credentials` when the artifact is absent or
    /// invalid; callers treat this as a fatal startup condition.
    pub fn load_from_env() -> Result<Self, SpeechError> {
        let path = std::env::var(CREDENTIALS_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string());
        Self::load(Path::new(&path))
    }

    /// The engine API key
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The cloud project the key belongs to, if declared
    #[must_use]
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }
}

// Keys never appear in logs or debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .finish()
    }
}
