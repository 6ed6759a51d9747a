//! Call graph loading errors.

use super::error_code::{self, TopographErrorCode};

/// Errors that can occur while loading an externally built call graph.
#[derive(Debug, thiserror::Error)]
pub enum CallGraphError {
    #[error("Invalid call graph JSON: {message}")]
    InvalidJson { message: String },

    #[error("Failed to read call graph {path}: {message}")]
    Io { path: String, message: String },
}

impl TopographErrorCode for CallGraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidJson { .. } => error_code::CALL_GRAPH_ERROR,
            Self::Io { .. } => error_code::IO_ERROR,
        }
    }
}
