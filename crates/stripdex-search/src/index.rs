//! The in-memory inverted index.
//!
//! Maps comic id to its keyword stems. Writers build a complete replacement
//! map off-lock and swap it in under the write lock, so readers observe
//! either the old or the new index in full.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

/// Candidate ranking key. Ordered by `(perfect desc, matched desc,
/// score desc, total asc)`; ties keep ascending-id order.
#[derive(Debug)]
struct Scored {
    id: i64,
    matched: usize,
    // Mirrors `matched` until per-occurrence frequency weighting lands.
    score: usize,
    total: usize,
    perfect: bool,
}

#[derive(Default)]
pub struct InvertedIndex {
    entries: RwLock<HashMap<i64, Vec<String>>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index in one operation.
    pub fn swap(&self, entries: HashMap<i64, Vec<String>>) {
        *self.entries.write() = entries;
    }

    /// Drop every entry.
    pub fn clear(&self) {
        *self.entries.write() = HashMap::new();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Rank indexed comics against the query keywords and return at most
    /// `limit` ids (`limit <= 0` returns all). An empty keyword set matches
    /// nothing.
    pub fn query(&self, keywords: &[String], limit: i64) -> Vec<i64> {
        if keywords.is_empty() {
            return Vec::new();
        }

        let keyword_set: HashSet<&str> = keywords.iter().map(String::as_str).collect();

        let mut scored = Vec::new();
        {
            let entries = self.entries.read();
            for (&id, words) in entries.iter() {
                let mut matched = 0;
                let mut score = 0;
                let mut counted = HashSet::new();
                for word in words {
                    if keyword_set.contains(word.as_str()) && counted.insert(word.as_str()) {
                        matched += 1;
                        score += 1;
                    }
                }
                if matched == 0 {
                    continue;
                }
                scored.push(Scored {
                    id,
                    matched,
                    score,
                    total: words.len(),
                    perfect: matched == keyword_set.len(),
                });
            }
        }

        // Map iteration order is arbitrary; fix the tie order before the
        // stable ranking sort.
        scored.sort_unstable_by_key(|s| s.id);
        scored.sort_by(|a, b| {
            b.perfect
                .cmp(&a.perfect)
                .then(b.matched.cmp(&a.matched))
                .then(b.score.cmp(&a.score))
                .then(a.total.cmp(&b.total))
        });

        let ids = scored.into_iter().map(|s| s.id);
        if limit > 0 {
            ids.take(limit as usize).collect()
        } else {
            ids.collect()
        }
    }
}
