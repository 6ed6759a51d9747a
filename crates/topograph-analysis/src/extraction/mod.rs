//! Test extraction contracts.
//!
//! Per-language extractors turn test source text into a uniform
//! `TestExtraction` record. The engine depends only on the `TestExtractor`
//! capability, never on any language's grammar.

pub mod extractor;
pub mod types;

pub use extractor::{ExtractorRegistry, TestExtractor};
pub use types::*;
