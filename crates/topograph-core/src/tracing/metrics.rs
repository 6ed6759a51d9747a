//! Structured span field names used across Topograph.
//!
//! Keeping field names in one place lets log queries match the same
//! field regardless of which subsystem emitted it.

/// Mapping builder: full rebuild time in milliseconds.
pub const MAPPING_BUILD_TIME: &str = "mapping_build_time";

/// Mapping builder: number of test cases mapped.
pub const TESTS_MAPPED: &str = "tests_mapped";

/// Mapping builder: number of direct test→function edges.
pub const DIRECT_EDGES: &str = "direct_edges";

/// Mapping builder: functions added through call graph traversal.
pub const TRANSITIVE_EDGES: &str = "transitive_edges";

/// Resolver: call-site names that matched no function.
pub const UNRESOLVED_CALLS: &str = "unresolved_calls";

/// Resolver: call-site names resolved by tie-break between several candidates.
pub const AMBIGUOUS_CALLS: &str = "ambiguous_calls";

/// Call graph: number of functions in the installed graph.
pub const GRAPH_FUNCTIONS: &str = "graph_functions";

/// Test impact analysis: number of tests selected for a change set.
pub const SELECTED_TESTS: &str = "selected_tests";
