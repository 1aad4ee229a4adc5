//! Domain models shared between the update and search services.

use serde::{Deserialize, Serialize};

/// One catalog strip, as stored and searched.
///
/// `words` is the normalized keyword list in insertion order. It is produced
/// once during ingest and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub words: Vec<String>,
}

/// Aggregates derived from the relational store. Always recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
}

/// Store aggregates plus the catalog's current last id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    pub words_total: i64,
    pub words_unique: i64,
    pub comics_fetched: i64,
    pub comics_total: i64,
}

impl ServiceStats {
    pub fn new(db: DbStats, comics_total: i64) -> Self {
        Self {
            words_total: db.words_total,
            words_unique: db.words_unique,
            comics_fetched: db.comics_fetched,
            comics_total,
        }
    }
}

/// Snapshot of the update service's run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    Running,
    Idle,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Idle => "idle",
        }
    }
}
