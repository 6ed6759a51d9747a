//! Test topology configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HIGH_MOCK_RATIO, DEFAULT_MIN_RISK, DEFAULT_MS_PER_TEST, DEFAULT_TOP_MOCKED_MODULES,
    DEFAULT_UNCOVERED_LIMIT,
};

/// Configuration for the test topology engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopologyConfig {
    /// Maximum uncovered functions returned when the caller gives no limit. Default: 50.
    pub uncovered_limit: Option<usize>,
    /// Minimum risk level: "low" | "medium" | "high". Default: "low".
    pub min_risk: Option<String>,
    /// Estimated runtime per test in milliseconds. Default: 100.
    pub ms_per_test: Option<u64>,
    /// Mock ratio above which a test is flagged as brittle. Default: 0.7.
    pub high_mock_ratio: Option<f64>,
    /// Number of most-mocked modules to report. Default: 10.
    pub top_mocked_modules: Option<usize>,
    /// Additional glob patterns that mark a file as a test file.
    #[serde(default)]
    pub extra_test_patterns: Vec<String>,
}

impl TopologyConfig {
    /// Returns the effective uncovered limit, defaulting to 50.
    pub fn effective_uncovered_limit(&self) -> usize {
        self.uncovered_limit.unwrap_or(DEFAULT_UNCOVERED_LIMIT)
    }

    /// Returns the effective minimum risk level, defaulting to "low".
    pub fn effective_min_risk(&self) -> &str {
        self.min_risk.as_deref().unwrap_or(DEFAULT_MIN_RISK)
    }

    /// Returns the effective per-test runtime estimate, defaulting to 100ms.
    pub fn effective_ms_per_test(&self) -> u64 {
        self.ms_per_test.unwrap_or(DEFAULT_MS_PER_TEST)
    }

    /// Returns the effective brittleness threshold, defaulting to 0.7.
    pub fn effective_high_mock_ratio(&self) -> f64 {
        self.high_mock_ratio.unwrap_or(DEFAULT_HIGH_MOCK_RATIO)
    }

    /// Returns the effective number of reported modules, defaulting to 10.
    pub fn effective_top_mocked_modules(&self) -> usize {
        self.top_mocked_modules.unwrap_or(DEFAULT_TOP_MOCKED_MODULES)
    }
}
