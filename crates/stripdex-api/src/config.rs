//! API gateway configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use stripdex_core::config::{deserialize_duration, env_override, parse_duration};

/// Configuration loaded from a YAML file with environment overrides.
///
/// Environment variables: `LOG_LEVEL`, `API_ADDRESS`, `TIMEOUT`,
/// `TOKEN_TTL`, `WORDS_ADDRESS`, `UPDATE_ADDRESS`, `SEARCH_ADDRESS`,
/// `SEARCH_CONCURRENCY`, `SEARCH_RATE`. Admin credentials come from
/// `ADMIN_USER` / `ADMIN_PASSWORD` and are required.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub address: String,
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub token_ttl: Duration,
    pub words_address: String,
    pub update_address: String,
    pub search_address: String,
    pub search_concurrency: usize,
    pub search_rate: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            address: "0.0.0.0:8080".to_string(),
            timeout: Duration::from_secs(30),
            token_ttl: Duration::from_secs(3600),
            words_address: "localhost:8081".to_string(),
            update_address: "localhost:8082".to_string(),
            search_address: "localhost:8083".to_string(),
            search_concurrency: 10,
            search_rate: 0,
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
        env_override(&mut cfg.address, "API_ADDRESS");
        env_override(&mut cfg.words_address, "WORDS_ADDRESS");
        env_override(&mut cfg.update_address, "UPDATE_ADDRESS");
        env_override(&mut cfg.search_address, "SEARCH_ADDRESS");

        if let Ok(raw) = std::env::var("TIMEOUT") {
            cfg.timeout = parse_duration(&raw)?;
        }
        if let Ok(raw) = std::env::var("TOKEN_TTL") {
            cfg.token_ttl = parse_duration(&raw)?;
        }
        if let Ok(raw) = std::env::var("SEARCH_CONCURRENCY") {
            cfg.search_concurrency = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid SEARCH_CONCURRENCY {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var("SEARCH_RATE") {
            cfg.search_rate = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid SEARCH_RATE {raw:?}"))?;
        }

        Ok(cfg)
    }
}
