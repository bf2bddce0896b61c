//! WebSocket client for the streaming recognition engine
//!
//! One `open()` call yields one recognition channel: a configuration
//! frame goes out first, raw audio frames follow as binary messages in
//! submission order, and an empty binary message signals end-of-audio
//! (half-close). Engine emissions come back as JSON text frames and are
//! surfaced through the [`RecognitionStream`] event channel.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, instrument, warn};

use crate::config::SpeechConfig;
use crate::credentials::Credentials;
use crate::error::SpeechError;
use crate::ports::{RecognitionEvent, RecognitionStream, StreamInput, StreamingRecognition};
use crate::types::TranscriptSegment;

/// Streaming recognition profile (fixed by the relay contract)
const STREAMING_ENCODING: &str = "WEBM_OPUS";
const STREAMING_SAMPLE_RATE_HERTZ: u32 = 48_000;

/// Streaming recognition adapter over WebSocket
#[derive(Debug, Clone)]
pub struct RealtimeRecognizer {
    config: Arc<SpeechConfig>,
    credentials: Arc<Credentials>,
}

impl RealtimeRecognizer {
    /// Create a new streaming recognizer
    #[must_use]
    pub fn new(config: Arc<SpeechConfig>, credentials: Arc<Credentials>) -> Self {
        Self {
            config,
            credentials,
        }
    }
}

/// Configuration frame sent once, before any audio
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StreamingStart<'a> {
    api_key: &'a str,
    encoding: &'a str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
    interim_results: bool,
}

/// Engine emission; transcript and error payloads share one frame shape
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamingPayload {
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default)]
    is_final: bool,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl StreamingRecognition for RealtimeRecognizer {
    #[instrument(skip(self))]
    async fn open(&self) -> Result<RecognitionStream, SpeechError> {
        let (socket, _) = connect_async(self.config.streaming_url.as_str())
            .await
            .map_err(|e| {
                SpeechError::ConnectionFailed(format!(
                    "streaming recognition connect failed: {e}"
                ))
            })?;

        let (mut write, mut read) = socket.split();

        let start = StreamingStart {
            api_key: self.credentials.api_key(),
            encoding: STREAMING_ENCODING,
            sample_rate_hertz: STREAMING_SAMPLE_RATE_HERTZ,
            language_code: &self.config.language_code,
            enable_automatic_punctuation: true,
            interim_results: true,
        };
        let start_payload = serde_json::to_string(&start)
            .map_err(|e| SpeechError::Streaming(format!("serialization error: {e}")))?;

        write
            .send(Message::Text(start_payload.into()))
            .await
            .map_err(|e| {
                SpeechError::Streaming(format!("failed to send streaming config: {e}"))
            })?;

        debug!("Streaming recognition channel established");

        let (input_tx, mut input_rx) = mpsc::channel::<StreamInput>(64);
        let (event_tx, event_rx) = mpsc::channel::<RecognitionEvent>(64);

        // Writer half: forwards frames in submission order; the empty
        // binary message is the engine's end-of-audio marker.
        tokio::spawn(async move {
            while let Some(input) = input_rx.recv().await {
                match input {
                    StreamInput::Audio(frame) => {
                        if write.send(Message::Binary(frame)).await.is_err() {
                            break;
                        }
                    },
                    StreamInput::Finish => {
                        let _ = write.send(Message::Binary(Bytes::new())).await;
                        break;
                    },
                }
            }
        });

        // Reader half: engine emissions become stream events. Engine
        // errors are surfaced but do not tear the channel down.
        tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        let event = match serde_json::from_str::<StreamingPayload>(text.as_str())
                        {
                            Ok(payload) => payload_event(payload),
                            Err(e) => {
                                warn!("Unparseable streaming payload: {}", e);
                                None
                            },
                        };
                        if let Some(event) = event {
                            if event_tx.send(event).await.is_err() {
                                return;
                            }
                        }
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {},
                    Err(e) => {
                        let _ = event_tx.send(RecognitionEvent::Error(e.to_string())).await;
                        break;
                    },
                }
            }
            let _ = event_tx.send(RecognitionEvent::Closed).await;
        });

        Ok(RecognitionStream::new(input_tx, event_rx))
    }
}

fn payload_event(payload: StreamingPayload) -> Option<RecognitionEvent> {
    if let Some(message) = payload.error {
        return Some(RecognitionEvent::Error(message));
    }
    payload.transcript.map(|text| {
        RecognitionEvent::Transcript(TranscriptSegment::new(text, payload.is_final))
    })
}
