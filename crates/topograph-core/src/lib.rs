//! # topograph-core
//!
//! Foundation crate for the Topograph test topology engine.
//! Errors, configuration, tracing, constants, and shared identifier types.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;
