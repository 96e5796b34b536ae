//! Error types for the transcription engine
//!
//! Only configuration misuse and collaborator failures (decoding, MIDI export)
//! surface as errors. Degenerate audio never does: it resolves to sentinel
//! values in the returned data.

use std::fmt;

/// Errors that can occur while building or running a transcription pipeline
#[derive(Debug, Clone)]
pub enum TranscriptionError {
    /// Malformed configuration, rejected at construction time
    InvalidConfig(String),

    /// Invalid arguments passed to a collaborator (channel mixing, normalization, ...)
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// MIDI serialization or file write error
    ExportError(String),
}

impl fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            TranscriptionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TranscriptionError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            TranscriptionError::ExportError(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TranscriptionError {}

impl From<std::io::Error> for TranscriptionError {
    fn from(err: std::io::Error) -> Self {
        TranscriptionError::ExportError(err.to_string())
    }
}
