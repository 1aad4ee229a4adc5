//! Best-effort shutdown orchestration.
//!
//! Services collect their long-lived resources as [`Closer`]s and close them
//! in a deterministic order on the way out. A failing close is logged and
//! never aborts the rest of the list.

use async_trait::async_trait;

/// A resource that should be released during shutdown.
#[async_trait]
pub trait Closer: Send {
    /// Short name used in shutdown logs.
    fn name(&self) -> &'static str;

    async fn close(&mut self) -> anyhow::Result<()>;
}

/// Close every resource in order, logging failures.
pub async fn close_all(closers: &mut [Box<dyn Closer>]) {
    for closer in closers {
        if let Err(err) = closer.close().await {
            tracing::error!(resource = closer.name(), error = %err, "close failed");
        }
    }
}
