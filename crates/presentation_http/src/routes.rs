//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
///
/// The live transcription bridge upgrades on the default endpoint: the
/// WebSocket shares the listening port with the HTTP API and needs no
/// distinguishing path.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(handlers::health::health_check))
        // Relay API
        .route("/api/tts", post(handlers::synthesize::synthesize))
        .route("/api/transcribe", post(handlers::transcribe::transcribe))
        // Live transcription bridge
        .route("/", get(handlers::live::upgrade))
        // Attach state
        .with_state(state)
}
