//! Test topology: test-to-function mapping, coverage, risk, test impact analysis.
//!
//! Resolves each test's direct call sites to call graph functions, closes
//! them transitively via BFS, and serves read-only queries over the
//! resulting bipartite index.

pub mod analyzer;
pub mod coverage;
pub mod mapping;
pub mod minimum_set;
pub mod mocks;
pub mod resolver;
pub mod summary;
pub mod test_files;
pub mod types;
pub mod uncovered;

pub use analyzer::TestTopologyAnalyzer;
pub use coverage::compute_file_coverage;
pub use mapping::build_coverage_mapping;
pub use minimum_set::{compute_minimum_covering_set, select_tests_for_changes};
pub use mocks::analyze_mocks;
pub use resolver::{FunctionResolver, Resolution, ResolvedCall};
pub use summary::compute_summary;
pub use test_files::TestFileClassifier;
pub use types::*;
pub use uncovered::{compute_risk_score, find_uncovered_functions};
