//! Types shared by the speech engine adapters

use serde::{Deserialize, Serialize};

/// MIME type of synthesized audio (the synthesis profile is fixed to MP3)
pub const SYNTHESIS_MIME_TYPE: &str = "audio/mpeg";

/// One transcript emission from the streaming recognition channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text (partial or final)
    pub text: String,
    /// Whether the engine marked this emission as final
    pub is_final: bool,
}

impl TranscriptSegment {
    /// Create a segment
    #[must_use]
    pub fn new(text: impl Into<String>, is_final: bool) -> Self {
        Self {
            text: text.into(),
            is_final,
        }
    }
}

/// One result entry from batch recognition, in engine order
///
/// Engines may return result entries with no alternatives at all; the
/// field defaults keep deserialization tolerant of that.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Candidate transcriptions, best first
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
}

/// A single candidate transcription
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecognitionAlternative {
    /// Transcript text; absent entries are skipped rather than failed on
    #[serde(default)]
    pub transcript: Option<String>,
}

/// Join the top alternative of every result entry, space-separated, in
/// the order the engine returned them. Entries without an alternative or
/// without a transcript are skipped.
#[must_use]
pub fn join_transcripts(results: &[RecognitionResult]) -> String {
    results
        .iter()
        .filter_map(|result| result.alternatives.first())
        .filter_map(|alternative| alternative.transcript.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}
