//! Shared constants for the Topograph engine.

/// Environment variable holding per-subsystem log filters.
pub const LOG_ENV_VAR: &str = "TOPOGRAPH_LOG";

/// Filter used when `TOPOGRAPH_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "topograph=info";

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "topograph.toml";

/// Default cap on uncovered functions returned by a single query.
pub const DEFAULT_UNCOVERED_LIMIT: usize = 50;

/// Default minimum risk level for uncovered function queries.
pub const DEFAULT_MIN_RISK: &str = "low";

/// Estimated runtime of a single test, used for time-saved estimates.
pub const DEFAULT_MS_PER_TEST: u64 = 100;

/// Mock ratio above which a test is flagged as brittle.
pub const DEFAULT_HIGH_MOCK_RATIO: f64 = 0.7;

/// Number of most-mocked modules reported by mock analysis.
pub const DEFAULT_TOP_MOCKED_MODULES: usize = 10;

/// Accepted values for the minimum risk setting.
pub const RISK_LEVELS: &[&str] = &["low", "medium", "high"];
