// In-memory cache implementation using DashMap
use crate::domain::model::Translation;
use dashmap::DashMap;

/// Thread-safe in-memory cache in front of the SQLite store
pub struct MemoryCache {
    map: DashMap<String, Translation>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Translation> {
        self.map.get(key).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, key: String, value: Translation) {
        self.map.insert(key, value);
    }

    pub fn clear(&self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}
