//! Rejected orchestrator commands.

/// Reasons a user command is refused before any work starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum CommandErrorKind {
    /// Another batch is already running
    #[display("A batch is already running")]
    BatchActive,
    /// The target slot already has a generation in flight
    #[display("{} slot {} is already generating", stage, index)]
    SlotPending {
        /// Pipeline stage name
        stage: String,
        /// Slot index
        index: usize,
    },
    /// The edit instruction was empty
    #[display("Edit instruction is empty")]
    EmptyInstruction,
}

/// Command error with location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{CommandError, CommandErrorKind};
///
/// let err = CommandError::new(CommandErrorKind::BatchActive);
/// assert!(format!("{}", err).contains("already running"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Command Error: {} at line {} in {}", kind, line, file)]
pub struct CommandError {
    /// The kind of error that occurred
    pub kind: CommandErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CommandError {
    /// Create a new command error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CommandErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
