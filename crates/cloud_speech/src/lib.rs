//! Cloud speech engine adapters for voicebridge
//!
//! Provides the leaf adapters and engine clients the relay forwards to:
//! - `SynthesisEngine` - text to synthesized audio (TTS)
//! - `RecognitionEngine` - batch audio to transcript (STT)
//! - `StreamingRecognition` - live duplex recognition channel
//! - `Transcoder` - FFmpeg-backed audio normalization
//! - `extract` - declared-extension document text extraction
//!
//! # Architecture
//!
//! This crate follows the ports & adapters pattern:
//! - `ports` module defines the traits (ports)
//! - `providers` module contains concrete implementations (adapters)
//!
//! The engines themselves are external collaborators; nothing here
//! re-implements synthesis or recognition.

pub mod config;
pub mod credentials;
pub mod error;
pub mod extract;
pub mod ports;
pub mod providers;
pub mod transcode;
pub mod types;

pub use config::SpeechConfig;
pub use credentials::Credentials;
pub use error::SpeechError;
pub use ports::{
    RecognitionEngine, RecognitionEvent, RecognitionStream, StreamInput, StreamingRecognition,
    SynthesisEngine, Transcode,
};
pub use providers::realtime::RealtimeRecognizer;
pub use providers::rest::CloudSpeechClient;
pub use transcode::Transcoder;
pub use types::{RecognitionAlternative, RecognitionResult, TranscriptSegment, join_transcripts};
