//! Precondition failures.

/// A precondition for a generation was not met.
///
/// Raised before the generation service is contacted: a missing upstream
/// result, an empty required text, or a usage gate that refused the work.
///
/// # Examples
///
/// ```
/// use reelsmith_error::ValidationError;
///
/// let err = ValidationError::new("Scene 2 has no visual description");
/// assert_eq!(err.message, "Scene 2 has no visual description");
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", message, line, file)]
pub struct ValidationError {
    /// Human-readable description of the unmet precondition
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
