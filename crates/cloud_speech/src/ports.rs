//! Port definitions for the speech engines
//!
//! Defines the traits the relay layer depends on, so handlers never see a
//! concrete engine client. The live bridge additionally gets
//! [`RecognitionStream`], a typed channel abstraction over the streaming
//! engine's data/error/end events.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::SpeechError;
use crate::types::{RecognitionResult, TranscriptSegment};

/// Port for speech synthesis (TTS)
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Synthesize speech for the given text with the fixed voice profile
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` when the engine rejects or fails the request;
    /// engine, network and quota failures are not distinguished.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// Port for batch speech recognition (STT)
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Recognize a complete normalized audio clip in non-streaming mode
    ///
    /// Returns the result entries in the order the engine produced them.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the engine call fails.
    async fn recognize(&self, audio: &[u8]) -> Result<Vec<RecognitionResult>, SpeechError>;
}

/// Port for opening streaming recognition channels
///
/// Each call to `open` yields a fresh channel; channels are never shared
/// between sessions or reused after close.
#[async_trait]
pub trait StreamingRecognition: Send + Sync {
    /// Open one streaming recognition channel with the fixed streaming
    /// profile (interim results enabled).
    ///
    /// # Errors
    ///
    /// Returns `SpeechError` if the channel cannot be established.
    async fn open(&self) -> Result<RecognitionStream, SpeechError>;
}

/// Port for audio normalization
#[async_trait]
pub trait Transcode: Send + Sync {
    /// Normalize an uploaded audio file for batch recognition, returning
    /// the derived output path once conversion has terminally completed.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Transcode` on conversion failure.
    async fn normalize(&self, input: &Path) -> Result<PathBuf, SpeechError>;
}

/// Input accepted by a streaming recognition channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamInput {
    /// One raw audio frame, forwarded verbatim
    Audio(Bytes),
    /// End-of-input signal (half-close); trailing output may still arrive
    Finish,
}

/// Event emitted by a streaming recognition channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A partial or final transcript emission
    Transcript(TranscriptSegment),
    /// An engine error; advisory, the channel may remain usable
    Error(String),
    /// The channel has closed and no further events will arrive
    Closed,
}

/// One live recognition channel
///
/// Owned by exactly one session. Audio goes in through `send_audio` in
/// strict submission order; transcript/error events come back out through
/// `next_event` in emission order. `finish` half-closes the input side at
/// most once.
#[derive(Debug)]
pub struct RecognitionStream {
    input: mpsc::Sender<StreamInput>,
    events: mpsc::Receiver<RecognitionEvent>,
    finished: bool,
}

impl RecognitionStream {
    /// Assemble a stream from its channel halves
    ///
    /// Providers wire these to a live engine connection; tests wire them
    /// to a scripted engine.
    #[must_use]
    pub fn new(
        input: mpsc::Sender<StreamInput>,
        events: mpsc::Receiver<RecognitionEvent>,
    ) -> Self {
        Self {
            input,
            events,
            finished: false,
        }
    }

    /// Forward one audio frame to the engine
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Streaming` if the channel is no longer
    /// accepting input (engine side gone, or already finished).
    pub async fn send_audio(&self, frame: Bytes) -> Result<(), SpeechError> {
        if self.finished {
            return Err(SpeechError::Streaming(
                "channel already half-closed".to_string(),
            ));
        }

        self.input
            .send(StreamInput::Audio(frame))
            .await
            .map_err(|_| SpeechError::Streaming("recognition channel closed".to_string()))
    }

    /// Signal end-of-input
    ///
    /// Idempotent: only the first call emits the half-close signal. Events
    /// already in flight can still be read afterwards.
    pub async fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let _ = self.input.send(StreamInput::Finish).await;
    }

    /// Receive the next engine event, or `None` once the channel is gone
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        self.events.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream_with_probe() -> (RecognitionStream, mpsc::Receiver<StreamInput>) {
        let (input_tx, input_rx) = mpsc::channel(16);
        let (_event_tx, event_rx) = mpsc::channel(16);
        // the unused event sender is dropped; next_event would yield None
        (RecognitionStream::new(input_tx, event_rx), input_rx)
    }

    #[tokio::test]
    async fn audio_frames_arrive_in_submission_order() {
        let (stream, mut probe) = stream_with_probe();

        for frame in [&b"A"[..], &b"B"[..], &b"C"[..]] {
            stream.send_audio(Bytes::from_static(frame)).await.unwrap();
        }

        for expected in [&b"A"[..], &b"B"[..], &b"C"[..]] {
            assert_eq!(
                probe.recv().await,
                Some(StreamInput::Audio(Bytes::from_static(expected)))
            );
        }
    }

    #[tokio::test]
    async fn finish_emits_exactly_one_signal() {
        let (mut stream, mut probe) = stream_with_probe();

        stream.finish().await;
        stream.finish().await;
        stream.finish().await;

        assert_eq!(probe.recv().await, Some(StreamInput::Finish));
        // sender side still alive inside the stream, so poll emptiness
        assert!(probe.try_recv().is_err());
    }

    #[tokio::test]
    async fn send_audio_after_finish_is_rejected() {
        let (mut stream, _probe) = stream_with_probe();

        stream.finish().await;
        let result = stream.send_audio(Bytes::from_static(b"late")).await;

        assert!(matches!(result, Err(SpeechError::Streaming(_))));
    }

    #[tokio::test]
    async fn send_audio_fails_when_engine_side_is_gone() {
        let (stream, probe) = stream_with_probe();
        drop(probe);

        let result = stream.send_audio(Bytes::from_static(b"A")).await;

        assert!(matches!(result, Err(SpeechError::Streaming(_))));
    }

    #[tokio::test]
    async fn events_are_delivered_in_emission_order() {
        let (input_tx, _input_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        let mut stream = RecognitionStream::new(input_tx, event_rx);

        event_tx
            .send(RecognitionEvent::Transcript(TranscriptSegment::new(
                "part", false,
            )))
            .await
            .unwrap();
        event_tx
            .send(RecognitionEvent::Transcript(TranscriptSegment::new(
                "partial words", true,
            )))
            .await
            .unwrap();
        event_tx
            .send(RecognitionEvent::Closed)
            .await
            .unwrap();
        drop(event_tx);

        assert_eq!(
            stream.next_event().await,
            Some(RecognitionEvent::Transcript(TranscriptSegment::new(
                "part", false
            )))
        );
        assert_eq!(
            stream.next_event().await,
            Some(RecognitionEvent::Transcript(TranscriptSegment::new(
                "partial words",
                true
            )))
        );
        assert_eq!(stream.next_event().await, Some(RecognitionEvent::Closed));
        assert_eq!(stream.next_event().await, None);
    }
}
