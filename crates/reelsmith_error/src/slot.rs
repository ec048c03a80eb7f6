//! Slot store misuse.
//!
//! These are programming errors: the runner must guarantee that only a
//! `Pending` slot is resolved or failed.

/// Slot store misuse conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SlotErrorKind {
    /// A transition was attempted from a state that does not allow it
    #[display("Illegal transition for slot {}: {} -> {}", index, from, to)]
    IllegalTransition {
        /// Slot index
        index: usize,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Slot index outside the store
    #[display("Slot {} out of range (store has {} slots)", index, len)]
    OutOfRange {
        /// Requested slot index
        index: usize,
        /// Number of slots in the store
        len: usize,
    },
}

/// Slot error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Slot Error: {} at line {} in {}", kind, line, file)]
pub struct SlotError {
    /// The kind of error that occurred
    pub kind: SlotErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SlotError {
    /// Create a new slot error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SlotErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
