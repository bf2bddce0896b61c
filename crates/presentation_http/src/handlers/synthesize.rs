//! Synthesis relay handler
//!
//! `POST /api/tts` takes a multipart form with an optional `text` field
//! and an optional `file` part. Exactly one of the two must resolve to
//! non-empty text before the engine is called. A failed synthesis gets
//! one fallback attempt with a fixed apology phrase; only when that also
//! fails does the client see a 500.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::{instrument, warn};

use cloud_speech::error::SpeechError;
use cloud_speech::extract::extract_text;
use cloud_speech::types::SYNTHESIS_MIME_TYPE;

use crate::error::ApiError;
use crate::state::AppState;

/// Spoken when the primary synthesis call fails
pub const FALLBACK_PHRASE: &str =
    "I am having trouble responding right now. Please try again in a moment.";

/// Handle a synthesis request
#[instrument(skip(state, multipart))]
pub async fn synthesize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut text: Option<String> = None;
    let mut document: Option<(bytes::Bytes, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {e}")))?
    {
        match field.name() {
            Some("text") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid text field: {e}")))?;
                text = Some(value);
            },
            Some("file") => {
                let extension = field.file_name().map(declared_extension).unwrap_or_default();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("invalid file part: {e}")))?;
                document = Some((bytes, extension));
            },
            _ => {},
        }
    }

    let resolved = match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => text,
        None => match document {
            Some((bytes, extension)) => {
                extract_text(&bytes, &extension).map_err(|e| match e {
                    SpeechError::UnsupportedDocument { .. } => {
                        ApiError::UnsupportedMediaType(e.to_string())
                    },
                    other => ApiError::BadRequest(other.to_string()),
                })?
            },
            None => return Err(ApiError::EmptyInput),
        },
    };

    let resolved = resolved.trim();
    if resolved.is_empty() {
        return Err(ApiError::EmptyInput);
    }

    // One primary attempt; on any engine failure, exactly one fallback
    // with the apology phrase. The fallback error never propagates past
    // this handler.
    let audio = match state.synthesis.synthesize(resolved).await {
        Ok(audio) => audio,
        Err(primary) => {
            warn!("Synthesis failed, attempting fallback: {}", primary);
            state
                .synthesis
                .synthesize(FALLBACK_PHRASE)
                .await
                .map_err(|fallback| ApiError::Synthesis(fallback.to_string()))?
        },
    };

    Ok(([(header::CONTENT_TYPE, SYNTHESIS_MIME_TYPE)], audio).into_response())
}

/// Lower-cased extension of an uploaded file name, without the dot
fn declared_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}
