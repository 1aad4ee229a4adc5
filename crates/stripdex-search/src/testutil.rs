//! In-memory fakes for the service ports, shared by the unit tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use stripdex_core::{Comic, Error, Normalizer, Result};

use crate::service::Storage;

pub(crate) struct FakeStorage {
    comics: Mutex<Vec<Comic>>,
    fail_get: bool,
    fail_get_all: AtomicBool,
}

impl FakeStorage {
    pub(crate) fn new(comics: Vec<Comic>) -> Self {
        Self {
            comics: Mutex::new(comics),
            fail_get: false,
            fail_get_all: AtomicBool::new(false),
        }
    }

    pub(crate) fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub(crate) fn fail_get_all(&self, fail: bool) {
        self.fail_get_all.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn replace(&self, comics: Vec<Comic>) {
        *self.comics.lock() = comics;
    }
}

#[async_trait]
impl Storage for FakeStorage {
    async fn search(&self, keyword: &str) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = self
            .comics
            .lock()
            .iter()
            .filter(|c| c.words.iter().any(|w| w == keyword))
            .map(|c| c.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn get(&self, id: i64) -> Result<Comic> {
        if self.fail_get {
            return Err(Error::Internal(anyhow::anyhow!("get failed")));
        }
        self.comics
            .lock()
            .iter()
            .find(|c| c.id == id)
            .map(|c| Comic {
                id: c.id,
                url: c.url.clone(),
                words: Vec::new(),
            })
            .ok_or(Error::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<Comic>> {
        if self.fail_get_all.load(Ordering::SeqCst) {
            return Err(Error::Internal(anyhow::anyhow!("get_all failed")));
        }
        Ok(self.comics.lock().clone())
    }

    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Comic>> {
        Ok(self
            .comics
            .lock()
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

/// Trivial normalizer: lowercase whitespace split. Deterministic stand-in
/// for the words service.
pub(crate) struct SplitWords;

#[async_trait]
impl Normalizer for SplitWords {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>> {
        Ok(phrase
            .to_lowercase()
            .split_whitespace()
            .map(|w| w.to_string())
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
