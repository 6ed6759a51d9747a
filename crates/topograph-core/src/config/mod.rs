//! Configuration system for Topograph.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod topograph_config;
pub mod topology_config;

pub use topograph_config::{ConfigOverrides, TopographConfig};
pub use topology_config::TopologyConfig;
