//! Batch transcription relay handler
//!
//! `POST /api/transcribe` takes a multipart form with a required `file`
//! part. The upload is spooled to a uuid-unique path, normalized by the
//! transcoder into a `.16k.wav` sibling, submitted to the recognition
//! engine in non-streaming mode, and the top alternatives are space-joined
//! in engine order. Both temp artifacts are deleted once recognition
//! succeeds; failure paths clean up best-effort.

use std::path::Path;

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tokio::fs;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use cloud_speech::types::join_transcripts;

use crate::error::ApiError;
use crate::state::AppState;

/// Transcription response body
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Space-joined transcript in engine result order
    pub transcript: String,
}

/// Handle a batch transcription request
#[instrument(skip(state, multipart))]
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut upload: Option<(bytes::Bytes, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let extension = field
                .file_name()
                .and_then(|name| Path::new(name).extension()?.to_str())
                .unwrap_or("bin")
                .to_ascii_lowercase();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("invalid file part: {e}")))?;
            upload = Some((bytes, extension));
        }
    }

    let (bytes, extension) = upload.ok_or(ApiError::MissingUpload)?;

    let upload_path = state
        .config
        .spool_dir()
        .join(format!("upload-{}.{extension}", Uuid::new_v4()));

    fs::write(&upload_path, &bytes)
        .await
        .map_err(|e| ApiError::Transcription(format!("cannot spool upload: {e}")))?;

    debug!(upload = %upload_path.display(), size = bytes.len(), "Upload spooled");

    let normalized_path = match state.transcoder.normalize(&upload_path).await {
        Ok(path) => path,
        Err(e) => {
            cleanup(&[&upload_path]).await;
            return Err(ApiError::Transcription(e.to_string()));
        },
    };

    let audio = match fs::read(&normalized_path).await {
        Ok(audio) => audio,
        Err(e) => {
            cleanup(&[&upload_path, &normalized_path]).await;
            return Err(ApiError::Transcription(format!(
                "cannot read normalized audio: {e}"
            )));
        },
    };

    match state.recognition.recognize(&audio).await {
        Ok(results) => {
            // job complete: both artifacts go, regardless of transcript content
            cleanup(&[&upload_path, &normalized_path]).await;
            Ok(Json(TranscribeResponse {
                transcript: join_transcripts(&results),
            }))
        },
        Err(e) => {
            cleanup(&[&upload_path, &normalized_path]).await;
            Err(ApiError::Transcription(e.to_string()))
        },
    }
}

/// Remove temp artifacts; removal failures are logged, never surfaced
async fn cleanup(paths: &[&Path]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), "Temp file cleanup failed: {}", e);
        }
    }
}
