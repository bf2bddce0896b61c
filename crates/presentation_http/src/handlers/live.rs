//! Live transcription bridge
//!
//! Each accepted WebSocket connection becomes one session: one streaming
//! recognition channel is opened for it, client audio frames are forwarded
//! verbatim in arrival order, and every engine emission (interim or final)
//! is pushed back as a `{"transcript"}` text frame in emission order. The
//! two ends are lifetime-coupled: a client close half-closes the channel,
//! a channel close drops the client.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tracing::{debug, error, instrument, warn};

use cloud_speech::ports::RecognitionEvent;

use crate::state::AppState;

/// Advisory error frame; the engine's own message is not exposed
const ENGINE_ERROR_FRAME: &str = r#"{"error":"Speech recognition error"}"#;

/// Upgrade handler for the default endpoint
#[instrument(skip(ws, state))]
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| session(socket, state))
}

/// Run one bridge session to completion
async fn session(mut socket: WebSocket, state: AppState) {
    // The channel opens immediately on accept; frames arriving before the
    // engine is ready wait on the transport, nothing is pre-buffered here.
    let mut stream = match state.streaming.open().await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Cannot open recognition channel: {}", e);
            let _ = socket.send(Message::Text(ENGINE_ERROR_FRAME.into())).await;
            return;
        },
    };

    debug!("Live session started");

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Binary(frame))) => {
                    if stream.send_audio(frame).await.is_err() {
                        // recognition side is gone; the session goes with it
                        break;
                    }
                },
                Some(Ok(Message::Close(_))) | None => {
                    debug!("Client closed, half-closing recognition channel");
                    stream.finish().await;
                    return;
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    debug!("WebSocket transport error: {}", e);
                    stream.finish().await;
                    return;
                },
            },
            event = stream.next_event() => match event {
                Some(RecognitionEvent::Transcript(segment)) => {
                    // interim and final results are forwarded identically
                    let frame = transcript_frame(&segment.text);
                    if socket.send(Message::Text(frame.into())).await.is_err() {
                        stream.finish().await;
                        return;
                    }
                },
                Some(RecognitionEvent::Error(message)) => {
                    warn!("Recognition engine error: {}", message);
                    if socket.send(Message::Text(ENGINE_ERROR_FRAME.into())).await.is_err() {
                        stream.finish().await;
                        return;
                    }
                    if state.config.live.close_session_on_engine_error {
                        stream.finish().await;
                        let _ = socket.send(Message::Close(None)).await;
                        return;
                    }
                },
                Some(RecognitionEvent::Closed) | None => break,
            },
        }
    }

    // recognition channel ended on its own; the client side follows
    debug!("Recognition channel closed, dropping client");
    let _ = socket.send(Message::Close(None)).await;
}

fn transcript_frame(text: &str) -> String {
    serde_json::json!({ "transcript": text }).to_string()
}
