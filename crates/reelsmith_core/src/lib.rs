//! Core data types for the reelsmith generation pipeline.
//!
//! This crate provides the foundation data types shared by every reelsmith crate:
//! slots and their statuses, generation requests and responses, production
//! settings, and the bounded configuration snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod history;
mod media;
mod request;
mod settings;
mod slot;
mod snapshot;
mod telemetry;

pub use history::{HistoryEntry, HistoryKind, HistoryResult, summarize};
pub use media::MediaPayload;
pub use request::{
    AspectRatio, GenerationMode, GenerationOutput, GenerationRequest, GenerationRequestBuilder,
    GenerationResponse, Resolution, VideoOptions,
};
pub use settings::{Language, ProductionSettings};
pub use slot::{GenerationSlot, SlotStatus, Stage};
pub use snapshot::{ConfigSnapshot, MAX_SNAPSHOT_TEXT_BYTES, ShortText, SnapshotValue};
pub use telemetry::init_tracing;
