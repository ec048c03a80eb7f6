//! Reelsmith - storyboard-driven generation pipeline
//!
//! Reelsmith turns a product description and reference images into a short-form video
//! storyboard, then generates one image and one video per scene through a pluggable
//! generation service. Slots are generated one at a time, can be cancelled, retried or
//! edited individually, and a failure in one slot never disturbs the others.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use reelsmith::{MediaPayload, Orchestrator, PipelineConfig, Stage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::new(MyService::new(), PipelineConfig::load()?);
//!     orchestrator.set_reference_media(Some(MediaPayload::new("image/png", product)), None);
//!     orchestrator.load_storyboard(&std::fs::read_to_string("storyboard.md")?)?;
//!
//!     let report = orchestrator.start_batch(Stage::Image).await?;
//!     println!("{} of {} images ready", report.ready().len(), orchestrator.config().slot_count());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Reelsmith is organized as a workspace with focused crates:
//!
//! - `reelsmith_error` - Error types
//! - `reelsmith_core` - Core data types (slots, requests, settings, snapshots)
//! - `reelsmith_interface` - Generation service, history log and usage gate traits
//! - `reelsmith_storage` - Snapshot stores
//! - `reelsmith_storyboard` - Storyboard parsing and scene editing
//! - `reelsmith_pipeline` - Slot stores, batch runner and the orchestrator
//!
//! This crate (`reelsmith`) re-exports everything for convenience.

pub use reelsmith_core::*;
pub use reelsmith_error::*;
pub use reelsmith_interface::*;
pub use reelsmith_pipeline::{
    BatchControl, BatchGuard, BatchReport, BatchStatus, FailureReason, InMemoryHistoryLog,
    Orchestrator, PipelineConfig, PipelineView, SlotGenerator, SlotJob, SlotOutcome,
    SlotStore, SnapshotAdapter, edit_job, image_job, prompt, video_job,
};
pub use reelsmith_storage::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use reelsmith_storyboard::{
    SceneFields, SceneRecord, Storyboard, default_label, extract_fields, has_scene_markers,
    strip_labels,
};
