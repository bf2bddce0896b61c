//! Audio normalization for batch recognition
//!
//! Wraps the external FFmpeg binary to rewrite an arbitrary uploaded audio
//! container into the fixed profile the batch recognition engine expects:
//! single channel, 16 kHz, 16-bit PCM in a WAV container. FFmpeg must be
//! installed on the system.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::SpeechError;
use crate::ports::Transcode;

/// Suffix appended to the upload path to derive the normalized artifact
pub const NORMALIZED_SUFFIX: &str = ".16k.wav";

/// FFmpeg-backed audio transcoder
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    /// FFmpeg binary path (defaults to "ffmpeg" in PATH)
    ffmpeg_path: Option<String>,
}

impl Transcoder {
    /// Create a new transcoder with default settings
    #[must_use]
    pub const fn new() -> Self {
        Self { ffmpeg_path: None }
    }

    /// Create a new transcoder with a custom FFmpeg path
    #[must_use]
    pub fn with_ffmpeg_path(path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: Some(path.into()),
        }
    }

    /// Get the FFmpeg binary path
    fn ffmpeg_path(&self) -> &str {
        self.ffmpeg_path.as_deref().unwrap_or("ffmpeg")
    }

    /// Check if FFmpeg is available on the system
    #[instrument(skip(self))]
    pub async fn is_available(&self) -> bool {
        Command::new(self.ffmpeg_path())
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .is_ok_and(|status| status.success())
    }

    /// Derive the normalized sibling path for an upload
    #[must_use]
    pub fn normalized_path(input: &Path) -> PathBuf {
        let mut path = OsString::from(input.as_os_str());
        path.push(NORMALIZED_SUFFIX);
        PathBuf::from(path)
    }
}

#[async_trait::async_trait]
impl Transcode for Transcoder {
    /// Normalize an uploaded audio file into the batch recognition profile
    ///
    /// Runs FFmpeg to completion and returns the derived output path. The
    /// output file must not be read before this returns Ok.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Transcode` if FFmpeg cannot be spawned or
    /// exits non-zero; the FFmpeg stderr is carried in the message.
    #[instrument(skip(self), fields(input = %input.display()))]
    async fn normalize(&self, input: &Path) -> Result<PathBuf, SpeechError> {
        let output_path = Self::normalized_path(input);

        debug!(output = %output_path.display(), "Normalizing audio upload");

        let output = Command::new(self.ffmpeg_path())
            .arg("-i")
            .arg(input)
            .args(["-codec:a", "pcm_s16le", "-ac", "1", "-ar", "16000"])
            .arg("-y")
            .args(["-loglevel", "error"])
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| SpeechError::Transcode(format!("Failed to spawn FFmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SpeechError::Transcode(format!(
                "FFmpeg conversion failed: {stderr}"
            )));
        }

        debug!(output = %output_path.display(), "Normalization complete");

        Ok(output_path)
    }
}
