//! Call graph consumed by the topology engine.
//!
//! Built by an external call graph builder; loaded here into a petgraph
//! StableGraph for traversal and file-level lookups.

pub mod types;

pub use types::{normalize_path, CallEdge, CallGraph, CallGraphData, CallSiteRef, FunctionNode};
