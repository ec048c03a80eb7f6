//! Trait definitions for the collaborators of the reelsmith pipeline.
//!
//! The orchestrator treats these as black boxes: it sends a prompt and reference
//! media to a [`GenerationService`], records successes in a [`HistoryLog`], and asks a
//! [`UsageGate`] before starting work.

mod traits;

pub use traits::{GenerationService, HistoryLog, OpenGate, UsageGate};
