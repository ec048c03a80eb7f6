//! Top-level error wrapper types.

use crate::{
    CommandError, ConfigError, ParseError, PersistenceError, ServiceError, SlotError,
    ValidationError,
};

/// This is the foundation error enum aggregating every error in the workspace.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ReelsmithError, ValidationError};
///
/// let err: ReelsmithError = ValidationError::new("No product image").into();
/// assert!(format!("{}", err).contains("Validation Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ReelsmithErrorKind {
    /// Unmet precondition
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Generation service failure
    #[from(ServiceError)]
    Service(ServiceError),
    /// Storyboard parse failure
    #[from(ParseError)]
    Parse(ParseError),
    /// Snapshot persistence failure
    #[from(PersistenceError)]
    Persistence(PersistenceError),
    /// Slot store misuse
    #[from(SlotError)]
    Slot(SlotError),
    /// Command rejected
    #[from(CommandError)]
    Command(CommandError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

impl ReelsmithErrorKind {
    /// Message suitable for showing next to a slot, without source location.
    pub fn user_message(&self) -> String {
        match self {
            ReelsmithErrorKind::Validation(e) => e.message.clone(),
            ReelsmithErrorKind::Service(e) => e.kind.to_string(),
            ReelsmithErrorKind::Parse(e) => e.kind.to_string(),
            ReelsmithErrorKind::Persistence(e) => e.kind.to_string(),
            ReelsmithErrorKind::Slot(e) => e.kind.to_string(),
            ReelsmithErrorKind::Command(e) => e.kind.to_string(),
            ReelsmithErrorKind::Config(e) => e.message.clone(),
        }
    }
}

/// Reelsmith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use reelsmith_error::{ConfigError, ReelsmithErrorKind, ReelsmithResult};
///
/// fn might_fail() -> ReelsmithResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), ReelsmithErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Reelsmith Error: {}", _0)]
pub struct ReelsmithError(Box<ReelsmithErrorKind>);

impl ReelsmithError {
    /// Create a new error from a kind.
    pub fn new(kind: ReelsmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ReelsmithErrorKind {
        &self.0
    }

    /// Message suitable for end users, without source location.
    pub fn user_message(&self) -> String {
        self.0.user_message()
    }
}

// Generic From implementation for any type that converts to ReelsmithErrorKind
impl<T> From<T> for ReelsmithError
where
    T: Into<ReelsmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for reelsmith operations.
pub type ReelsmithResult<T> = std::result::Result<T, ReelsmithError>;
