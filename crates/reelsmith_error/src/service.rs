//! Generation service error types.

/// Failure conditions reported by (or about) the external generation service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// The call itself failed
    #[display("Generation request failed: {}", _0)]
    Request(String),
    /// The call succeeded but produced nothing usable
    #[display("{}", _0)]
    EmptyResult(String),
    /// The service does not support the requested call shape
    #[display("Generation mode not supported: {}", _0)]
    Unsupported(String),
}

/// Generation service error with source location tracking.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::Request("HTTP 503".to_string()));
/// assert!(format!("{}", err).contains("HTTP 503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of error that occurred
    pub kind: ServiceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
