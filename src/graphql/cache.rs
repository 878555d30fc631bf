//! In-memory cache of list query results
//!
//! Entries are keyed by the query's root field plus its arguments. Mutations
//! evict whole root fields, so every page of e.g. `withdrawals` goes at once
//! and the next visit refetches.

use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub root: &'static str,
    pub args: String,
}

impl CacheKey {
    pub fn new(root: &'static str, args: impl Into<String>) -> Self {
        Self {
            root,
            args: args.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Value>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, value: Value) {
        self.entries.insert(key, value);
    }

    /// Drop every entry stored under `root`; returns how many were removed
    pub fn evict(&mut self, root: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.root != root);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(root, removed, "Evicted cached query results");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
