//! API error handling
//!
//! Converts relay failures into the client-facing contract. The two
//! endpoints speak different error shapes: `/api/tts` answers plain text,
//! `/api/transcribe` answers JSON `{error}`. Each variant knows which
//! shape it renders.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Uploaded document has an extension no extraction adapter handles
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// No usable text after resolving the synthesis input
    #[error("No text to synthesize")]
    EmptyInput,

    /// Malformed multipart payload
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Transcription endpoint called without a file part
    #[error("No audio file uploaded")]
    MissingUpload,

    /// Synthesis failed, including the fallback attempt
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// Batch transcription failed
    #[error("Transcription failed: {0}")]
    Transcription(String),
}

/// JSON error body used by the transcription endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::UnsupportedMediaType(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            },
            Self::EmptyInput => {
                (StatusCode::BAD_REQUEST, "No text to synthesize".to_string()).into_response()
            },
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Self::Synthesis(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Speech synthesis failed".to_string(),
            )
                .into_response(),
            Self::MissingUpload => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "No audio file uploaded".to_string(),
                }),
            )
                .into_response(),
            Self::Transcription(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: message }),
            )
                .into_response(),
        }
    }
}
