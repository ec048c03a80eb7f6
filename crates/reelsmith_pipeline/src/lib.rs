//! Generation orchestration for reelsmith.
//!
//! The [`Orchestrator`] owns two fixed-size slot arrays, one of images and one of
//! videos, and drives a storyboard through them: one call per scene, in order, with
//! cooperative cancellation and per-slot retry and edit. Generation itself is
//! delegated to a [`reelsmith_interface::GenerationService`].
//!
//! # Example
//!
//! ```no_run
//! use reelsmith_core::Stage;
//! use reelsmith_interface::GenerationService;
//! use reelsmith_pipeline::{Orchestrator, PipelineConfig};
//!
//! # async fn example(service: impl GenerationService) -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(service, PipelineConfig::load()?);
//! orchestrator.load_storyboard("**Scene 1:**\nA jar on a table.")?;
//!
//! let report = orchestrator.start_batch(Stage::Image).await?;
//! for index in report.failed() {
//!     orchestrator.retry_slot(Stage::Image, *index).await?;
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod config;
mod generator;
mod history;
mod orchestrator;
pub mod prompt;
mod slots;
mod snapshot;

pub use batch::{BatchControl, BatchGuard, BatchReport, BatchStatus};
pub use config::PipelineConfig;
pub use generator::{
    FailureReason, INTERRUPTED_MESSAGE, SlotGenerator, SlotJob, SlotOutcome, edit_job, image_job,
    video_job,
};
pub use history::InMemoryHistoryLog;
pub use orchestrator::{Orchestrator, PipelineView};
pub use slots::SlotStore;
pub use snapshot::SnapshotAdapter;
