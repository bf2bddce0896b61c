//! Document text extraction
//!
//! Dispatches on the declared file extension, not on content sniffing:
//! `.txt` is decoded as UTF-8, `.pdf` and `.docx` go through structured
//! extraction, and anything else is rejected before any extraction
//! library runs.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

use crate::error::SpeechError;

/// Extract plain text from an uploaded document
///
/// # Errors
///
/// Returns `SpeechError::UnsupportedDocument` for an extension no adapter
/// handles, or `SpeechError::DocumentExtraction` when the extraction
/// library fails on the bytes.
pub fn extract_text(bytes: &[u8], extension: &str) -> Result<String, SpeechError> {
    let extension = extension.trim_start_matches('.').to_ascii_lowercase();

    match extension.as_str() {
        "txt" => Ok(String::from_utf8_lossy(bytes).into_owned()),
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| SpeechError::DocumentExtraction(format!("PDF extraction failed: {e}"))),
        "docx" => docx_text(bytes),
        _ => Err(SpeechError::UnsupportedDocument { extension }),
    }
}

/// Collect the run text of every paragraph in a DOCX document
fn docx_text(bytes: &[u8]) -> Result<String, SpeechError> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| SpeechError::DocumentExtraction(format!("DOCX extraction failed: {e}")))?;

    let mut text = String::new();
    for child in docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };

        let mut line = String::new();
        for paragraph_child in paragraph.children {
            let ParagraphChild::Run(run) = paragraph_child else {
                continue;
            };
            for run_child in run.children {
                if let RunChild::Text(t) = run_child {
                    line.push_str(&t.text);
                }
            }
        }

        if !line.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&line);
        }
    }

    debug!(chars = text.len(), "DOCX text extracted");
    Ok(text)
}
