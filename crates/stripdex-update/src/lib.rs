//! Stripdex Update - catalog synchronization service.
//!
//! Owns the writer side of the comic store. One ingest run at a time fetches
//! every catalog id the store does not know yet, normalizes its text through
//! the words service, and inserts the result. Lifecycle events are published
//! on the bus so the search service can refresh its index.

mod catalog;
pub mod config;
mod notifier;
mod routes;
mod service;
mod storage;

#[cfg(test)]
pub(crate) mod testutil;

pub use self::catalog::{CatalogItem, XkcdClient};
pub use self::config::Config;
pub use self::notifier::{NatsNotifier, Notifier};
pub use self::routes::router;
pub use self::service::{Catalog, Storage, UpdateService};
pub use self::storage::SqliteStorage;
