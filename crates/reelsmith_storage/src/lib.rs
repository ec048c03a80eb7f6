//! Snapshot storage for reelsmith.
//!
//! This crate provides the small string-keyed, string-valued persistence surface the
//! pipeline uses to remember configuration across restarts. Binary media never goes
//! through it.
//!
//! # Example
//!
//! ```rust
//! use reelsmith_storage::{MemorySnapshotStore, SnapshotStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemorySnapshotStore::with_limit(1024);
//! store.set("session", r#"{"vibe":"Calm"}"#)?;
//! assert_eq!(store.get("session")?.as_deref(), Some(r#"{"vibe":"Calm"}"#));
//!
//! // Values above the ceiling are refused
//! assert!(store.set("session", &"x".repeat(2048)).is_err());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;

use reelsmith_error::ReelsmithResult;

pub use filesystem::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use reelsmith_error::{PersistenceError, PersistenceErrorKind};

/// A string-keyed, string-valued persistent store with a size ceiling.
///
/// Implementations must refuse a value larger than their ceiling with
/// `PersistenceErrorKind::QuotaExceeded` and leave the previous value in place.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> ReelsmithResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> ReelsmithResult<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ReelsmithResult<()>;

    /// Largest value, in bytes, this store accepts.
    fn max_bytes(&self) -> usize;
}

/// Refuse `value` when it exceeds `limit` bytes.
pub(crate) fn check_quota(value: &str, limit: usize) -> ReelsmithResult<()> {
    if value.len() > limit {
        return Err(PersistenceError::new(PersistenceErrorKind::QuotaExceeded {
            size: value.len(),
            limit,
        })
        .into());
    }
    Ok(())
}
