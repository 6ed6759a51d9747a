//! Error handling for Topograph.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod call_graph_error;
pub mod config_error;
pub mod error_code;
pub mod extraction_error;
pub mod topology_error;

pub use call_graph_error::CallGraphError;
pub use config_error::ConfigError;
pub use error_code::TopographErrorCode;
pub use extraction_error::ExtractionError;
pub use topology_error::TopologyError;
