//! Words service configuration.

use std::path::Path;

use serde::Deserialize;

use stripdex_core::config::env_override;

/// Configuration loaded from a YAML file with environment overrides.
///
/// Environment variables:
/// - `LOG_LEVEL`: log filter (default: "info")
/// - `WORDS_ADDRESS`: bind address (default: "0.0.0.0:8081")
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub address: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address: "0.0.0.0:8081".to_string(),
        }
    }
}

impl Config {
    /// Load from `path` when it exists, otherwise start from defaults, then
    /// apply environment overrides.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut cfg = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&raw)?
        } else {
            Self::default()
        };

        env_override(&mut cfg.log_level, "LOG_LEVEL");
        env_override(&mut cfg.address, "WORDS_ADDRESS");

        Ok(cfg)
    }
}
