//! In-memory snapshot store.

use crate::{SnapshotStore, check_quota};
use reelsmith_error::ReelsmithResult;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Default ceiling, matching what a browser-style local store tolerates.
const DEFAULT_LIMIT: usize = 5 * 1024 * 1024;

/// Snapshot store kept in process memory.
///
/// Useful for tests and for sessions that should not outlive the process.
#[derive(Debug)]
pub struct MemorySnapshotStore {
    data: Mutex<HashMap<String, String>>,
    limit: usize,
}

impl MemorySnapshotStore {
    /// Creates an empty store with the default ceiling.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT)
    }

    /// Creates an empty store that refuses values above `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            limit,
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn get(&self, key: &str) -> ReelsmithResult<Option<String>> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ReelsmithResult<()> {
        check_quota(value, self.limit)?;
        debug!(key, bytes = value.len(), "Setting snapshot value");
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ReelsmithResult<()> {
        debug!(key, "Removing snapshot value");
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }

    fn max_bytes(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemorySnapshotStore::new();

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert!(store.is_empty());

        // Removing again is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_quota_keeps_previous_value() {
        let store = MemorySnapshotStore::with_limit(4);
        store.set("a", "abcd").unwrap();
        assert!(store.set("a", "abcde").is_err());
        assert_eq!(store.get("a").unwrap().as_deref(), Some("abcd"));
    }
}
