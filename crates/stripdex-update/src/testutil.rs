//! In-memory fakes for the service ports, shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use stripdex_core::{Comic, DbStats, Error, Event, Normalizer, Result};

use crate::catalog::CatalogItem;
use crate::notifier::Notifier;
use crate::service::{Catalog, Storage};

#[derive(Default)]
pub(crate) struct FakeStorage {
    ids: Vec<i64>,
    added: Mutex<Vec<Comic>>,
    stats: DbStats,
    fail_add: bool,
    fail_drop: bool,
    dropped: AtomicBool,
}

impl FakeStorage {
    pub(crate) fn with_ids(ids: &[i64]) -> Self {
        Self {
            ids: ids.to_vec(),
            ..Self::default()
        }
    }

    pub(crate) fn with_stats(mut self, stats: DbStats) -> Self {
        self.stats = stats;
        self
    }

    pub(crate) fn failing_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    pub(crate) fn failing_drop(mut self) -> Self {
        self.fail_drop = true;
        self
    }

    pub(crate) fn added(&self) -> Vec<Comic> {
        self.added.lock().clone()
    }

    pub(crate) fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn add(&self, comic: Comic) -> Result<()> {
        if self.fail_add {
            return Err(Error::Internal(anyhow::anyhow!("add failed")));
        }
        self.added.lock().push(comic);
        Ok(())
    }

    async fn ids(&self) -> Result<Vec<i64>> {
        Ok(self.ids.clone())
    }

    async fn stats(&self) -> Result<DbStats> {
        Ok(self.stats)
    }

    async fn drop_all(&self) -> Result<()> {
        if self.fail_drop {
            return Err(Error::Internal(anyhow::anyhow!("drop failed")));
        }
        self.dropped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub(crate) struct FakeCatalog {
    last: i64,
    items: HashMap<i64, CatalogItem>,
    delay: Option<Duration>,
}

impl FakeCatalog {
    pub(crate) fn new(last: i64) -> Self {
        Self {
            last,
            items: HashMap::new(),
            delay: None,
        }
    }

    pub(crate) fn with_item(mut self, id: i64) -> Self {
        self.items.insert(
            id,
            CatalogItem {
                id,
                url: format!("https://example.com/{id}"),
                description: format!("strip number {id}"),
            },
        );
        self
    }

    pub(crate) fn with_all_items(mut self) -> Self {
        for id in 1..=self.last {
            self = self.with_item(id);
        }
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn get(&self, id: i64) -> Result<CatalogItem> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.items.get(&id).cloned().ok_or(Error::NotFound)
    }

    async fn last_id(&self) -> Result<i64> {
        Ok(self.last)
    }
}

pub(crate) struct FakeWords {
    words: Vec<String>,
}

impl FakeWords {
    pub(crate) fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[async_trait]
impl Normalizer for FakeWords {
    async fn norm(&self, _phrase: &str) -> Result<Vec<String>> {
        Ok(self.words.clone())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeNotifier {
    events: Mutex<Vec<Event>>,
    fail: bool,
}

impl FakeNotifier {
    pub(crate) fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn publish(&self, event: Event) -> Result<()> {
        if self.fail {
            return Err(Error::Unavailable("broker is down".to_string()));
        }
        self.events.lock().push(event);
        Ok(())
    }
}
