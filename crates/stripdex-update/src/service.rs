//! Update service core: the ingest run and its exclusive-run discipline.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Semaphore;

use stripdex_core::{
    Comic, DbStats, Error, Event, Normalizer, Result, ServiceStats, UpdateStatus,
};

use crate::catalog::CatalogItem;
use crate::notifier::Notifier;

/// Writer-side store operations the service needs.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn add(&self, comic: Comic) -> Result<()>;
    async fn ids(&self) -> Result<Vec<i64>>;
    async fn stats(&self) -> Result<DbStats>;
    async fn drop_all(&self) -> Result<()>;
}

/// External catalog oracle.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch one strip. `NotFound` means the id does not exist; id gaps are
    /// legal in the catalog.
    async fn get(&self, id: i64) -> Result<CatalogItem>;

    /// Current highest issued id.
    async fn last_id(&self) -> Result<i64>;
}

/// The update service.
///
/// A single-permit semaphore guards the ingest run: acquisition is
/// non-blocking, so a second concurrent caller fails with `AlreadyRunning`
/// instead of queuing. The permit is tied to the job task and is released on
/// every exit path.
pub struct UpdateService {
    storage: Arc<dyn Storage>,
    catalog: Arc<dyn Catalog>,
    words: Arc<dyn Normalizer>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    run_gate: Arc<Semaphore>,
    shutdown: Arc<AtomicBool>,
}

impl UpdateService {
    pub fn new(
        storage: Arc<dyn Storage>,
        catalog: Arc<dyn Catalog>,
        words: Arc<dyn Normalizer>,
        notifier: Arc<dyn Notifier>,
        concurrency: usize,
    ) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::BadArgument(
                "fetch concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            storage,
            catalog,
            words,
            notifier,
            concurrency,
            run_gate: Arc::new(Semaphore::new(1)),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Flag checked between fetches; set it to stop scheduling new ids while
    /// in-flight fetches settle.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    /// Run a catalog sync. Returns once the run completes.
    ///
    /// The job itself runs on its own task: once launched it is owned by the
    /// service and finishes even if the calling request goes away.
    pub async fn update(&self) -> Result<()> {
        let permit = self
            .run_gate
            .clone()
            .try_acquire_owned()
            .map_err(|_| Error::AlreadyRunning)?;

        let storage = self.storage.clone();
        let catalog = self.catalog.clone();
        let words = self.words.clone();
        let notifier = self.notifier.clone();
        let concurrency = self.concurrency;
        let shutdown = self.shutdown.clone();

        let job = tokio::spawn(async move {
            let _permit = permit;
            ingest(storage, catalog, words, notifier, concurrency, shutdown).await
        });

        job.await
            .map_err(|err| Error::Internal(anyhow::anyhow!("update job died: {err}")))?
    }

    /// Non-blocking snapshot of the run state.
    pub fn status(&self) -> UpdateStatus {
        if self.run_gate.available_permits() == 0 {
            UpdateStatus::Running
        } else {
            UpdateStatus::Idle
        }
    }

    /// Store aggregates plus the catalog's current last id.
    pub async fn stats(&self) -> Result<ServiceStats> {
        let db = self.storage.stats().await?;
        let comics_total = self.catalog.last_id().await?;
        Ok(ServiceStats::new(db, comics_total))
    }

    /// Truncate the store, then announce it on the bus.
    pub async fn drop_all(&self) -> Result<()> {
        self.storage.drop_all().await?;
        if let Err(err) = self.notifier.publish(Event::Dropped).await {
            tracing::warn!(error = %err, "failed to publish drop event");
        }
        Ok(())
    }
}

async fn ingest(
    storage: Arc<dyn Storage>,
    catalog: Arc<dyn Catalog>,
    words: Arc<dyn Normalizer>,
    notifier: Arc<dyn Notifier>,
    concurrency: usize,
    shutdown: Arc<AtomicBool>,
) -> Result<()> {
    let known: HashSet<i64> = storage.ids().await?.into_iter().collect();
    let last_id = catalog.last_id().await?;
    let missing: Vec<i64> = (1..=last_id).filter(|id| !known.contains(id)).collect();

    tracing::info!(
        last_id,
        known = known.len(),
        missing = missing.len(),
        "starting ingest run"
    );

    futures::stream::iter(missing)
        .for_each_concurrent(concurrency, |id| {
            let storage = storage.clone();
            let catalog = catalog.clone();
            let words = words.clone();
            let shutdown = shutdown.clone();
            async move {
                if shutdown.load(Ordering::SeqCst) {
                    return;
                }
                fetch_one(&*storage, &*catalog, &*words, id).await;
            }
        })
        .await;

    if let Err(err) = notifier.publish(Event::Updated).await {
        tracing::warn!(error = %err, "failed to publish update event");
    }

    tracing::info!("ingest run finished");
    Ok(())
}

/// Fetch, normalize, and store one strip. Per-item failures are absorbed so
/// the run keeps going; each completed insert is individually durable.
async fn fetch_one(storage: &dyn Storage, catalog: &dyn Catalog, words: &dyn Normalizer, id: i64) {
    let item = match catalog.get(id).await {
        Ok(item) => item,
        Err(Error::NotFound) => {
            tracing::debug!(id, "no comic with this id, skipping");
            return;
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "failed to fetch comic");
            return;
        }
    };

    let stems = match words.norm(&item.description).await {
        Ok(stems) => stems,
        Err(err) => {
            tracing::warn!(id, error = %err, "failed to normalize description");
            return;
        }
    };

    let comic = Comic {
        id: item.id,
        url: item.url,
        words: stems,
    };
    if let Err(err) = storage.add(comic).await {
        tracing::warn!(id, error = %err, "failed to store comic");
    }
}
