//! Application state shared across handlers

use std::sync::Arc;

use cloud_speech::ports::{RecognitionEngine, StreamingRecognition, SynthesisEngine, Transcode};

use crate::config::AppConfig;

/// Shared application state
///
/// Everything here is immutable after startup; handlers clone the `Arc`s
/// freely across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    /// Synthesis engine client
    pub synthesis: Arc<dyn SynthesisEngine>,
    /// Batch recognition engine client
    pub recognition: Arc<dyn RecognitionEngine>,
    /// Streaming recognition channel factory
    pub streaming: Arc<dyn StreamingRecognition>,
    /// Audio transcoder
    pub transcoder: Arc<dyn Transcode>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
