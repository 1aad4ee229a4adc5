//! Update service configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use stripdex_core::config::{deserialize_duration, env_override, parse_duration};

/// Configuration loaded from a YAML file with environment overrides.
///
/// Environment variables: `LOG_LEVEL`, `UPDATE_ADDRESS`, `DB_ADDRESS`,
/// `WORDS_ADDRESS`, `XKCD_URL`, `XKCD_TIMEOUT`, `XKCD_CONCURRENCY`,
/// `BROKER_ADDRESS`, `TOPIC`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub address: String,
    pub db_address: String,
    pub words_address: String,
    pub xkcd: XkcdConfig,
    pub broker_address: String,
    pub topic: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct XkcdConfig {
    pub url: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address: "0.0.0.0:8082".to_string(),
            db_address: "stripdex.db".to_string(),
            words_address: "localhost:8081".to_string(),
            xkcd: XkcdConfig::default(),
            broker_address: "nats://localhost:4222".to_string(),
            topic: "xkcd.db.updated".to_string(),
        }
    }
}

impl Default for XkcdConfig {
    fn default() -> Self {
        Self {
            url: "https://xkcd.com".to_string(),
            timeout: Duration::from_secs(10),
            concurrency: 10,
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
        env_override(&mut cfg.address, "UPDATE_ADDRESS");
        env_override(&mut cfg.db_address, "DB_ADDRESS");
        env_override(&mut cfg.words_address, "WORDS_ADDRESS");
        env_override(&mut cfg.xkcd.url, "XKCD_URL");
        env_override(&mut cfg.broker_address, "BROKER_ADDRESS");
        env_override(&mut cfg.topic, "TOPIC");

        if let Ok(raw) = std::env::var("XKCD_TIMEOUT") {
            cfg.xkcd.timeout = parse_duration(&raw)?;
        }
        if let Ok(raw) = std::env::var("XKCD_CONCURRENCY") {
            cfg.xkcd.concurrency = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid XKCD_CONCURRENCY {raw:?}"))?;
        }

        Ok(cfg)
    }
}
