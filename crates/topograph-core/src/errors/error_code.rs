//! TopographErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string
/// that survives across process and language boundaries.
pub trait TopographErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the coded error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CALL_GRAPH_ERROR: &str = "CALL_GRAPH_ERROR";
pub const EXTRACTION_ERROR: &str = "EXTRACTION_ERROR";
pub const UNSUPPORTED_FILE: &str = "UNSUPPORTED_FILE";
pub const IO_ERROR: &str = "IO_ERROR";
