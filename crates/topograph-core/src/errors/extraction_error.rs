//! Test extraction errors.

use super::error_code::{self, TopographErrorCode};

/// Errors raised by test extractors or while loading extraction records.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("No extractor supports {path}")]
    UnsupportedFile { path: String },

    #[error("Extraction failed for {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Invalid extraction JSON: {message}")]
    InvalidJson { message: String },
}

impl TopographErrorCode for ExtractionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFile { .. } => error_code::UNSUPPORTED_FILE,
            Self::Malformed { .. } | Self::InvalidJson { .. } => error_code::EXTRACTION_ERROR,
        }
    }
}
