//! Top-level Topograph configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::TopologyConfig;
use crate::constants::{PROJECT_CONFIG_FILE, RISK_LEVELS};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Programmatic overrides (applied via `apply_overrides`)
/// 2. Environment variables (`TOPOGRAPH_*`)
/// 3. Project config (`topograph.toml` in project root)
/// 4. User config (`~/.topograph/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopographConfig {
    pub topology: TopologyConfig,
}

/// Override arguments that take precedence over every file and env layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub uncovered_limit: Option<usize>,
    pub min_risk: Option<String>,
    pub ms_per_test: Option<u64>,
}

impl TopographConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        ::tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(o) = overrides {
            Self::apply_overrides(&mut config, o);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &TopographConfig) -> Result<(), ConfigError> {
        let topology = &config.topology;
        if let Some(ref risk) = topology.min_risk {
            if !RISK_LEVELS.contains(&risk.as_str()) {
                return Err(ConfigError::ValidationFailed {
                    field: "topology.min_risk".to_string(),
                    message: format!("must be one of {}", RISK_LEVELS.join(", ")),
                });
            }
        }
        if let Some(ratio) = topology.high_mock_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(ConfigError::ValidationFailed {
                    field: "topology.high_mock_ratio".to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if topology.uncovered_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "topology.uncovered_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for pattern in &topology.extra_test_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::ValidationFailed {
                    field: "topology.extra_test_patterns".to_string(),
                    message: format!("invalid glob '{pattern}': {e}"),
                });
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.topograph/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".topograph").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut TopographConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: TopographConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut TopographConfig, other: &TopographConfig) {
        let (base, other) = (&mut base.topology, &other.topology);
        if other.uncovered_limit.is_some() {
            base.uncovered_limit = other.uncovered_limit;
        }
        if other.min_risk.is_some() {
            base.min_risk = other.min_risk.clone();
        }
        if other.ms_per_test.is_some() {
            base.ms_per_test = other.ms_per_test;
        }
        if other.high_mock_ratio.is_some() {
            base.high_mock_ratio = other.high_mock_ratio;
        }
        if other.top_mocked_modules.is_some() {
            base.top_mocked_modules = other.top_mocked_modules;
        }
        if !other.extra_test_patterns.is_empty() {
            base.extra_test_patterns = other.extra_test_patterns.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `TOPOGRAPH_UNCOVERED_LIMIT`, `TOPOGRAPH_MIN_RISK`, etc.
    fn apply_env_overrides(config: &mut TopographConfig) {
        let topology = &mut config.topology;
        if let Ok(val) = std::env::var("TOPOGRAPH_UNCOVERED_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                topology.uncovered_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TOPOGRAPH_MIN_RISK") {
            topology.min_risk = Some(val.to_lowercase());
        }
        if let Ok(val) = std::env::var("TOPOGRAPH_MS_PER_TEST") {
            if let Ok(v) = val.parse::<u64>() {
                topology.ms_per_test = Some(v);
            }
        }
        if let Ok(val) = std::env::var("TOPOGRAPH_HIGH_MOCK_RATIO") {
            if let Ok(v) = val.parse::<f64>() {
                topology.high_mock_ratio = Some(v);
            }
        }
    }

    /// Apply programmatic overrides (highest priority).
    fn apply_overrides(config: &mut TopographConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.uncovered_limit {
            config.topology.uncovered_limit = Some(v);
        }
        if let Some(ref v) = overrides.min_risk {
            config.topology.min_risk = Some(v.clone());
        }
        if let Some(v) = overrides.ms_per_test {
            config.topology.ms_per_test = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
