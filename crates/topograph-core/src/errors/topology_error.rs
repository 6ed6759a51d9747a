//! Top-level error aggregating subsystem errors.

use super::error_code::TopographErrorCode;
use super::{CallGraphError, ConfigError, ExtractionError};

/// Any error surfaced by the fallible edges of the engine
/// (config loading, input decoding, extraction).
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Call graph error: {0}")]
    CallGraph(#[from] CallGraphError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}

impl TopographErrorCode for TopologyError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::CallGraph(e) => e.error_code(),
            Self::Extraction(e) => e.error_code(),
        }
    }
}
