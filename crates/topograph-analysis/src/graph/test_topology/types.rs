//! Test topology types: bipartite mapping and query results.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use topograph_core::types::{FunctionId, FxHashMap, FxHashSet, TestId};

use super::resolver::Resolution;

/// How a test reaches a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReachType {
    /// Called explicitly in the test body.
    Direct,
    /// Reached through call graph traversal from a directly called function.
    Transitive,
}

impl ReachType {
    /// Fixed confidence for this reach type.
    pub fn confidence(&self) -> f32 {
        match self {
            Self::Direct => 0.9,
            Self::Transitive => 0.6,
        }
    }

    /// Coarse two-level depth: 1 for direct, 2 for transitive.
    pub fn depth(&self) -> u32 {
        match self {
            Self::Direct => 1,
            Self::Transitive => 2,
        }
    }
}

/// Where a test case lives, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRef {
    pub file: String,
    pub name: String,
    pub qualified_name: String,
}

/// The bipartite test ↔ function index.
///
/// Invariant: `f ∈ test_to_functions[t]` ⇔ `t ∈ function_to_tests[f]`.
#[derive(Debug, Clone, Default)]
pub struct CoverageMapping {
    /// test → every function it reaches (direct and transitive).
    pub test_to_functions: FxHashMap<TestId, FxHashSet<FunctionId>>,
    /// function → every test that reaches it.
    pub function_to_tests: FxHashMap<FunctionId, FxHashSet<TestId>>,
    /// test → its direct resolutions and how each was resolved.
    pub direct: FxHashMap<TestId, FxHashMap<FunctionId, Resolution>>,
    /// Every ingested test case, mapped or not.
    pub tests: FxHashMap<TestId, TestRef>,
}

impl CoverageMapping {
    /// Insert a test → function edge into both directions. Returns true if new.
    pub fn link(&mut self, test: &TestId, function: &FunctionId) -> bool {
        let inserted = self
            .test_to_functions
            .entry(test.clone())
            .or_default()
            .insert(function.clone());
        if inserted {
            self.function_to_tests
                .entry(function.clone())
                .or_default()
                .insert(test.clone());
        }
        inserted
    }

    /// Tests covering `function`.
    pub fn tests_for(&self, function: &str) -> Option<&FxHashSet<TestId>> {
        self.function_to_tests.get(function).filter(|t| !t.is_empty())
    }

    /// Whether at least one test reaches `function`.
    pub fn is_covered(&self, function: &str) -> bool {
        self.tests_for(function).is_some()
    }

    /// How `test` directly resolved `function`, if it did.
    pub fn direct_resolution(&self, test: &str, function: &str) -> Option<Resolution> {
        self.direct.get(test).and_then(|d| d.get(function)).copied()
    }

    pub fn clear(&mut self) {
        self.test_to_functions.clear();
        self.function_to_tests.clear();
        self.direct.clear();
        self.tests.clear();
    }
}

/// Counters from one `build_mappings` run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingStats {
    pub tests_mapped: usize,
    pub direct_edges: usize,
    pub transitive_edges: usize,
    pub unresolved_calls: usize,
    pub ambiguous_calls: usize,
    #[serde(skip)]
    pub duration: Duration,
}

/// Per-test detail for a file coverage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCoverageInfo {
    pub test_id: TestId,
    pub test_name: String,
    pub test_file: String,
    pub reach_type: ReachType,
    pub depth: u32,
    pub confidence: f32,
    /// Functions of the reported file this test covers.
    pub covered_functions: Vec<FunctionId>,
}

/// Per-function detail for a file coverage report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCoverageInfo {
    pub function_id: FunctionId,
    pub name: String,
    pub qualified_name: String,
    pub line: u32,
    pub covered_by: Vec<TestId>,
    pub is_covered: bool,
    /// Every covering test mocks this function.
    pub is_mocked_only: bool,
}

/// Coverage report for one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCoverage {
    pub file: String,
    pub tests: Vec<TestCoverageInfo>,
    pub functions: Vec<FunctionCoverageInfo>,
    pub covered_functions: usize,
    pub total_functions: usize,
    pub coverage_percent: u32,
}

/// Minimum risk level for uncovered function queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Minimum risk score admitted at this level.
    pub fn threshold(&self) -> u32 {
        match self {
            Self::Low => 0,
            Self::Medium => 30,
            Self::High => 60,
        }
    }

    /// Parse a config value; unknown values fall back to `Low`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Low,
        }
    }
}

/// Options for `get_uncovered_functions`. `None` fields take the configured defaults.
#[derive(Debug, Clone)]
pub struct UncoveredOptions {
    pub min_risk: Option<RiskLevel>,
    pub limit: Option<usize>,
    pub include_reasons: bool,
}

impl Default for UncoveredOptions {
    fn default() -> Self {
        Self {
            min_risk: None,
            limit: None,
            include_reasons: true,
        }
    }
}

/// Why a function may legitimately lack tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UncoveredReason {
    /// No callers and not an entry point.
    DeadCode,
    /// Name looks like a framework lifecycle hook.
    FrameworkHook,
    /// Plain accessor.
    Trivial,
}

/// A function with no covering test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UncoveredFunction {
    pub function_id: FunctionId,
    pub name: String,
    pub qualified_name: String,
    pub file: String,
    pub line: u32,
    pub risk_score: u32,
    pub possible_reasons: Vec<UncoveredReason>,
}

/// A test chosen by change-based selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedTest {
    pub test_id: TestId,
    pub file: String,
    pub name: String,
    pub qualified_name: String,
    /// Names the first changed function that justified selecting this test.
    pub reason: String,
}

/// Result of change-based test selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinimumTestSet {
    pub tests: Vec<SelectedTest>,
    pub total_tests: usize,
    pub selected_tests: usize,
    pub time_saved_ms: u64,
    /// Human-readable `time_saved_ms` ("1.5m", "3.0s").
    pub time_saved: String,
    pub changed_functions: usize,
    /// % of changed functions with at least one covering test.
    pub changed_code_coverage: u32,
}

/// Result of greedy set cover over the whole mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoveringTestSet {
    pub tests: Vec<TestId>,
    pub covered_functions: usize,
    pub total_tests: usize,
    pub coverage_percent: f32,
}

/// A test whose mock ratio marks it as brittle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighMockTest {
    pub test_id: TestId,
    pub file: String,
    pub name: String,
    pub mock_ratio: f64,
}

/// A module and how often it is mocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MockedModule {
    pub module: String,
    pub count: usize,
}

/// Project-wide mock statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MockAnalysis {
    pub total_mocks: usize,
    pub external_mocks: usize,
    pub internal_mocks: usize,
    pub external_percent: u32,
    pub internal_percent: u32,
    pub avg_mock_ratio: f64,
    pub high_mock_ratio_tests: Vec<HighMockTest>,
    pub top_mocked_modules: Vec<MockedModule>,
}

/// Project-wide rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestTopologySummary {
    pub test_files: usize,
    pub test_cases: usize,
    pub skipped_tests: usize,
    pub by_framework: BTreeMap<String, usize>,
    pub avg_quality_score: f64,
    pub avg_mock_ratio: f64,
    /// Source (non-test) files with at least one covered function. 0 without a call graph.
    pub covered_files: usize,
    pub total_files: usize,
    pub file_coverage_percent: u32,
    pub covered_functions: usize,
    pub total_functions: usize,
    pub function_coverage_percent: u32,
}

/// `round(part / whole * 100)`, with `empty` returned when `whole` is 0.
pub(crate) fn percent(part: usize, whole: usize, empty: u32) -> u32 {
    if whole == 0 {
        empty
    } else {
        (part as f64 / whole as f64 * 100.0).round() as u32
    }
}
