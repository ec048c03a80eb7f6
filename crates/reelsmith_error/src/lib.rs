//! Error types for the reelsmith pipeline.
//!
//! This crate provides the foundation error types used throughout the reelsmith workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use reelsmith_error::{ReelsmithResult, ValidationError};
//!
//! fn check_prompt(prompt: &str) -> ReelsmithResult<()> {
//!     if prompt.trim().is_empty() {
//!         Err(ValidationError::new("Prompt is empty"))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_prompt("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod error;
mod parse;
mod persistence;
mod service;
mod slot;
mod validation;

pub use command::{CommandError, CommandErrorKind};
pub use config::ConfigError;
pub use error::{ReelsmithError, ReelsmithErrorKind, ReelsmithResult};
pub use parse::{ParseError, ParseErrorKind};
pub use persistence::{PersistenceError, PersistenceErrorKind};
pub use service::{ServiceError, ServiceErrorKind};
pub use slot::{SlotError, SlotErrorKind};
pub use validation::ValidationError;
