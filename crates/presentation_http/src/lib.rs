//! voicebridge HTTP presentation layer
//!
//! This crate provides the HTTP and WebSocket surface of the relay:
//! `/api/tts`, `/api/transcribe`, and the live transcription bridge on
//! the default endpoint.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
