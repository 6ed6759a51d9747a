//! # topograph-analysis
//!
//! Test topology engine for Topograph.
//! Maps tests to the production functions they exercise over an externally
//! built call graph, then answers coverage, risk, test impact, and mock
//! quality queries from that index.

#![allow(clippy::module_inception)]

pub mod call_graph;
pub mod extraction;
pub mod graph;

pub use graph::test_topology::TestTopologyAnalyzer;
