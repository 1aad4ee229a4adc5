//! Search service core: both search paths and the index lifecycle.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use stripdex_core::{Comic, Normalizer, Result};

use crate::index::InvertedIndex;

/// Reader-side store operations the service needs.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<i64>>;
    async fn get(&self, id: i64) -> Result<Comic>;
    async fn get_all(&self) -> Result<Vec<Comic>>;
    async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<Comic>>;
}

/// The search service.
pub struct SearchService {
    storage: Arc<dyn Storage>,
    words: Arc<dyn Normalizer>,
    index: InvertedIndex,
}

impl SearchService {
    pub fn new(storage: Arc<dyn Storage>, words: Arc<dyn Normalizer>) -> Self {
        Self {
            storage,
            words,
            index: InvertedIndex::new(),
        }
    }

    /// DB-backed search: rank ids by how many query keywords hit them.
    ///
    /// `limit <= 0` returns everything. Any failure resolving a ranked id
    /// fails the whole call.
    pub async fn search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>> {
        let keywords = self.words.norm(phrase).await?;
        tracing::debug!(phrase, ?keywords, "normalized query");

        let mut hits: HashMap<i64, usize> = HashMap::new();
        for keyword in &keywords {
            for id in self.storage.search(keyword).await? {
                *hits.entry(id).or_default() += 1;
            }
        }

        let mut ranked: Vec<(i64, usize)> = hits.into_iter().collect();
        // Fix the tie order before the stable ranking sort.
        ranked.sort_unstable_by_key(|(id, _)| *id);
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let take = if limit > 0 {
            (limit as usize).min(ranked.len())
        } else {
            ranked.len()
        };

        let mut comics = Vec::with_capacity(take);
        for (id, _) in ranked.into_iter().take(take) {
            comics.push(self.storage.get(id).await?);
        }

        tracing::debug!(count = comics.len(), "search finished");
        Ok(comics)
    }

    /// Index-backed search: rank against the in-memory index, then resolve
    /// the surviving ids in one store call, preserving ranked order.
    pub async fn index_search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>> {
        let keywords = self.words.norm(phrase).await?;
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let ids = self.index.query(&keywords, limit);
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let comics = self.storage.get_by_ids(&ids).await?;
        let mut by_id: HashMap<i64, Comic> = comics.into_iter().map(|c| (c.id, c)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Rebuild the index from the store and swap it in atomically. A store
    /// failure leaves the previous index intact.
    pub async fn index_comics(&self) -> Result<()> {
        let comics = self.storage.get_all().await?;
        let entries: HashMap<i64, Vec<String>> =
            comics.into_iter().map(|c| (c.id, c.words)).collect();
        let count = entries.len();
        self.index.swap(entries);
        tracing::info!(comics = count, "index rebuilt");
        Ok(())
    }

    /// Wipe the index.
    pub fn clear_index(&self) {
        self.index.clear();
        tracing::info!("index cleared");
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &InvertedIndex {
        &self.index
    }
}

/// Index refresher: an immediate initial build, then a rebuild every `ttl`.
/// Bus events trigger rebuilds with lower latency; this timer is the
/// correctness backstop when the bus drops them.
pub async fn run_refresher(service: Arc<SearchService>, ttl: Duration) {
    let mut interval = tokio::time::interval(ttl);
    loop {
        interval.tick().await;
        if let Err(err) = service.index_comics().await {
            tracing::error!(error = %err, "failed to rebuild index");
        }
    }
}
