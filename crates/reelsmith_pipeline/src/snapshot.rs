//! Snapshot persistence adapter.

use reelsmith_core::ConfigSnapshot;
use reelsmith_storage::SnapshotStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Saves and restores the bounded configuration snapshot.
///
/// Neither direction ever fails the caller: storage problems are logged and the
/// session carries on with what it has in memory.
#[derive(Clone)]
pub struct SnapshotAdapter {
    store: Arc<dyn SnapshotStore>,
    key: String,
}

impl std::fmt::Debug for SnapshotAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotAdapter")
            .field("key", &self.key)
            .field("max_bytes", &self.store.max_bytes())
            .finish()
    }
}

impl SnapshotAdapter {
    /// Creates an adapter storing under `key`.
    pub fn new(store: Arc<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Persist `snapshot`, replacing the previous one.
    ///
    /// Returns whether the snapshot was stored. A failure (for example a value over
    /// the store's ceiling) leaves the previous snapshot in place.
    pub fn save(&self, snapshot: &ConfigSnapshot) -> bool {
        let json = match snapshot.to_json_string() {
            Ok(json) => json,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to serialize snapshot");
                return false;
            }
        };

        match self.store.set(&self.key, &json) {
            Ok(()) => {
                debug!(key = %self.key, fields = snapshot.len(), bytes = json.len(), "Saved snapshot");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to save snapshot");
                false
            }
        }
    }

    /// The stored snapshot, if one exists and can be read.
    pub fn load(&self) -> Option<ConfigSnapshot> {
        let json = match self.store.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                debug!(key = %self.key, "No stored snapshot");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read snapshot");
                return None;
            }
        };

        match ConfigSnapshot::from_json_str(&json) {
            Ok(snapshot) => {
                debug!(key = %self.key, fields = snapshot.len(), "Loaded snapshot");
                Some(snapshot)
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding unreadable snapshot");
                None
            }
        }
    }

    /// Remove the stored snapshot.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_storage::MemorySnapshotStore;

    #[test]
    fn test_round_trip() {
        let adapter = SnapshotAdapter::new(Arc::new(MemorySnapshotStore::new()), "k");
        let mut snapshot = ConfigSnapshot::new();
        snapshot.insert_flag("include_model", true);
        snapshot.insert_integer("creativity_level", 7);
        snapshot.insert_text("vibe", "Calm").unwrap();

        assert!(adapter.save(&snapshot));
        assert_eq!(adapter.load(), Some(snapshot));
    }

    #[test]
    fn test_quota_degrades_gracefully() {
        let store = Arc::new(MemorySnapshotStore::with_limit(64));
        let adapter = SnapshotAdapter::new(store.clone(), "k");

        let mut small = ConfigSnapshot::new();
        small.insert_flag("a", true);
        assert!(adapter.save(&small));

        let mut large = ConfigSnapshot::new();
        large.insert_text("product_description", "x".repeat(200)).unwrap();
        assert!(!adapter.save(&large));

        assert_eq!(adapter.load(), Some(small));
    }

    #[test]
    fn test_garbage_is_ignored() {
        let store = Arc::new(MemorySnapshotStore::new());
        store.set("k", "not json").unwrap();
        let adapter = SnapshotAdapter::new(store, "k");
        assert_eq!(adapter.load(), None);

        adapter.clear();
        assert_eq!(adapter.load(), None);
    }
}
