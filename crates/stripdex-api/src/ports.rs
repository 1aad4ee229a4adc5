//! Backend contracts the gateway fans out to.

use async_trait::async_trait;

use stripdex_core::{Comic, Result, ServiceStats, UpdateStatus};

/// Liveness probe shared by every backend.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

/// Update service contract. `update` fails with `AlreadyRunning` when a run
/// is in flight.
#[async_trait]
pub trait Updater: Send + Sync {
    async fn update(&self) -> Result<()>;
    async fn status(&self) -> Result<UpdateStatus>;
    async fn stats(&self) -> Result<ServiceStats>;
    async fn drop_all(&self) -> Result<()>;
}

/// Search service contract. Both calls fail with `NotFound` when the result
/// is empty.
#[async_trait]
pub trait Searcher: Send + Sync {
    async fn search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>>;
    async fn index_search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>>;
}
