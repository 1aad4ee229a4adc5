//! Small helpers shared by the per-service configuration modules.
//!
//! Durations in config files use the compact `10s` / `5m` / `24h` notation.
//! A bare number is taken as seconds.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse a duration like `250ms`, `10s`, `5m`, or `24h`.
pub fn parse_duration(input: &str) -> anyhow::Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        anyhow::bail!("empty duration");
    }

    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let value: u64 = number
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid duration {input:?}"))?;

    let duration = match unit {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value * 60),
        "h" => Duration::from_secs(value * 3600),
        other => anyhow::bail!("unknown duration unit {other:?} in {input:?}"),
    };
    Ok(duration)
}

/// Serde adapter for duration config fields.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

/// Override a string config field from the environment, if set.
pub fn env_override(field: &mut String, var: &str) {
    if let Ok(value) = std::env::var(var) {
        *field = value;
    }
}
