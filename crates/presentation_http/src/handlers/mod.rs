//! HTTP and WebSocket handlers

pub mod health;
pub mod live;
pub mod synthesize;
pub mod transcribe;
