//! Search service configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use stripdex_core::config::{deserialize_duration, env_override, parse_duration};

/// Configuration loaded from a YAML file with environment overrides.
///
/// Environment variables: `LOG_LEVEL`, `SEARCH_ADDRESS`, `DB_ADDRESS`,
/// `WORDS_ADDRESS`, `INDEX_TTL`, `BROKER_ADDRESS`, `TOPIC`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub address: String,
    pub db_address: String,
    pub words_address: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub index_ttl: Duration,
    pub broker_address: String,
    pub topic: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address: "0.0.0.0:8083".to_string(),
            db_address: "stripdex.db".to_string(),
            words_address: "localhost:8081".to_string(),
            index_ttl: Duration::from_secs(24 * 3600),
            broker_address: "nats://localhost:4222".to_string(),
            topic: "xkcd.db.updated".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut cfg: Self = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_yaml::from_str(&raw)?
        } else {
            Self::default()
        };

        env_override(&mut cfg.log_level, "LOG_LEVEL");
        env_override(&mut cfg.address, "SEARCH_ADDRESS");
        env_override(&mut cfg.db_address, "DB_ADDRESS");
        env_override(&mut cfg.words_address, "WORDS_ADDRESS");
        env_override(&mut cfg.broker_address, "BROKER_ADDRESS");
        env_override(&mut cfg.topic, "TOPIC");

        if let Ok(raw) = std::env::var("INDEX_TTL") {
            cfg.index_ttl = parse_duration(&raw)?;
        }

        Ok(cfg)
    }
}
