//! Snapshot persistence error types.

/// Kinds of persistence errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PersistenceErrorKind {
    /// Failed to create the snapshot directory
    #[display("Failed to create snapshot directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to serialize a snapshot
    #[display("Failed to serialize snapshot: {}", _0)]
    Serialize(String),
    /// Failed to read a stored value
    #[display("Failed to read snapshot: {}", _0)]
    Read(String),
    /// Failed to write a stored value
    #[display("Failed to write snapshot: {}", _0)]
    Write(String),
    /// Value exceeds the store's size ceiling
    #[display("Snapshot of {} bytes exceeds the {} byte limit", size, limit)]
    QuotaExceeded {
        /// Size of the rejected value
        size: usize,
        /// Configured ceiling
        limit: usize,
    },
    /// A text field is too long to be part of a snapshot
    #[display("Snapshot text of {} bytes exceeds the {} byte limit", size, limit)]
    TextTooLong {
        /// Size of the rejected text
        size: usize,
        /// Maximum accepted size
        limit: usize,
    },
}

/// Persistence error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{PersistenceError, PersistenceErrorKind};
///
/// let err = PersistenceError::new(PersistenceErrorKind::QuotaExceeded { size: 10, limit: 4 });
/// assert!(format!("{}", err).contains("exceeds"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Persistence Error: {} at line {} in {}", kind, line, file)]
pub struct PersistenceError {
    /// The kind of error that occurred
    pub kind: PersistenceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PersistenceError {
    /// Create a new persistence error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PersistenceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
