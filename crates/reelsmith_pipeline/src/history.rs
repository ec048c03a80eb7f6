//! In-memory history log.

use async_trait::async_trait;
use reelsmith_core::HistoryEntry;
use reelsmith_error::ReelsmithResult;
use reelsmith_interface::HistoryLog;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// History log kept in process memory.
///
/// Clones share the same entries, so a caller can keep a handle while the
/// orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryLog {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl InMemoryHistoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(&self, entry: HistoryEntry) -> ReelsmithResult<()> {
        debug!(kind = %entry.kind(), summary = %entry.prompt_summary(), "Recording history entry");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }
}
