//! In-memory fakes for the backend ports, shared by the unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use stripdex_core::{Comic, Error, Result, ServiceStats, UpdateStatus};

use crate::ports::{Pinger, Searcher, Updater};

pub(crate) struct FakePinger {
    pub(crate) ok: bool,
}

#[async_trait]
impl Pinger for FakePinger {
    async fn ping(&self) -> Result<()> {
        if self.ok {
            Ok(())
        } else {
            Err(Error::Unavailable("backend is down".to_string()))
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeUpdater {
    update_error: Mutex<Option<Error>>,
    stats: Mutex<ServiceStats>,
}

impl FakeUpdater {
    pub(crate) fn with_update_error(self, err: Error) -> Self {
        *self.update_error.lock() = Some(err);
        self
    }

    pub(crate) fn with_stats(self, stats: ServiceStats) -> Self {
        *self.stats.lock() = stats;
        self
    }
}

#[async_trait]
impl Updater for FakeUpdater {
    async fn update(&self) -> Result<()> {
        match self.update_error.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn status(&self) -> Result<UpdateStatus> {
        Ok(UpdateStatus::Idle)
    }

    async fn stats(&self) -> Result<ServiceStats> {
        Ok(*self.stats.lock())
    }

    async fn drop_all(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeSearcher {
    search_result: Mutex<Vec<Comic>>,
    search_error: Mutex<Option<Error>>,
    index_result: Mutex<Vec<Comic>>,
}

impl FakeSearcher {
    pub(crate) fn with_search(self, comics: Vec<Comic>) -> Self {
        *self.search_result.lock() = comics;
        self
    }

    pub(crate) fn with_search_error(self, err: Error) -> Self {
        *self.search_error.lock() = Some(err);
        self
    }

    pub(crate) fn with_index_search(self, comics: Vec<Comic>) -> Self {
        *self.index_result.lock() = comics;
        self
    }
}

#[async_trait]
impl Searcher for FakeSearcher {
    async fn search(&self, _phrase: &str, _limit: i64) -> Result<Vec<Comic>> {
        if let Some(err) = self.search_error.lock().take() {
            return Err(err);
        }
        Ok(self.search_result.lock().clone())
    }

    async fn index_search(&self, _phrase: &str, _limit: i64) -> Result<Vec<Comic>> {
        if let Some(err) = self.search_error.lock().take() {
            return Err(err);
        }
        Ok(self.index_result.lock().clone())
    }
}
