//! Stripdex Search - phrase search service.
//!
//! Serves two search paths over the same store: a live DB-backed
//! keyword-intersection ranking and an in-memory inverted index that is
//! rebuilt on a TTL and on bus events. Readers of the index never see a
//! partial rebuild; rebuilds assemble a fresh map and swap it in whole.

pub mod config;
mod index;
mod listener;
mod routes;
mod service;
mod storage;

#[cfg(test)]
pub(crate) mod testutil;

pub use self::config::Config;
pub use self::index::InvertedIndex;
pub use self::listener::{BusCloser, NatsListener};
pub use self::routes::router;
pub use self::service::{run_refresher, SearchService, Storage};
pub use self::storage::SqliteStorage;
