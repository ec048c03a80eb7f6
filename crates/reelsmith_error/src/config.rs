//! Errors raised while loading or validating `reelsmith.toml`.

/// A configuration source could not be read, or a setting is out of range.
///
/// `key` names the offending setting when the error is about one value rather
/// than a whole file.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong
    pub message: String,
    /// Setting the error is about, if any
    pub key: Option<&'static str>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Error about a configuration source as a whole.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to read configuration from reelsmith.toml");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            key: None,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Error about the setting `key`; the message is prefixed with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use reelsmith_error::ConfigError;
    ///
    /// let err = ConfigError::invalid("slot_count", "must be at least 1");
    /// assert_eq!(err.key, Some("slot_count"));
    /// assert_eq!(err.message, "slot_count must be at least 1");
    /// ```
    #[track_caller]
    pub fn invalid(key: &'static str, problem: impl std::fmt::Display) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: format!("{key} {problem}"),
            key: Some(key),
            line: location.line(),
            file: location.file(),
        }
    }
}
