//! Test utilities for pipeline tests.
//!
//! This module provides a scripted generation service, collaborator stubs and
//! fixtures shared by the integration tests.

pub mod mock_service;

#[allow(unused_imports)]
pub use mock_service::{CallGate, MockResponse, MockService};

use async_trait::async_trait;
use reelsmith_core::{HistoryEntry, MediaPayload, Stage};
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult, ValidationError};
use reelsmith_interface::{HistoryLog, UsageGate};
use reelsmith_pipeline::{Orchestrator, PipelineConfig};

/// Four-scene storyboard with voiceover and caption fields.
#[allow(dead_code)]
pub const STORYBOARD: &str = "\
**Scene 1:**
Voiceover: Meet your new morning ritual.
Captions: Cold brew, done right
A glass jar of cold brew on a sunlit kitchen counter.

**Scene 2:**
Voiceover: Smooth, never bitter.
Ice cubes drop into a tall glass as the coffee pours.

**Scene 3:**
Voiceover: Ready in seconds.
A hand lifts the jar from the fridge.

**Scene 4:**
Voiceover: Grab yours today.
The product label in close up with soft bokeh.";

/// Product reference image.
#[allow(dead_code)]
pub fn product_image() -> MediaPayload {
    MediaPayload::new("image/png", vec![0xAA, 0xBB])
}

/// Face reference image.
#[allow(dead_code)]
pub fn face_image() -> MediaPayload {
    MediaPayload::new("image/jpeg", vec![0xCC])
}

/// Orchestrator with a product image and [`STORYBOARD`] loaded.
#[allow(dead_code)]
pub fn ready_orchestrator(service: MockService) -> Orchestrator<MockService> {
    let orchestrator = Orchestrator::new(service, PipelineConfig::default());
    orchestrator.set_reference_media(Some(product_image()), None);
    orchestrator
        .load_storyboard(STORYBOARD)
        .expect("fixture storyboard has scene markers");
    orchestrator
}

/// History log whose every append fails.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct FailingHistoryLog;

#[async_trait]
impl HistoryLog for FailingHistoryLog {
    async fn append(&self, _entry: HistoryEntry) -> ReelsmithResult<()> {
        Err(PersistenceError::new(PersistenceErrorKind::Write(
            "history database unavailable".to_string(),
        ))
        .into())
    }
}

/// Usage gate that refuses everything.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RejectingGate;

impl UsageGate for RejectingGate {
    fn check(&self, _stage: Option<Stage>) -> ReelsmithResult<()> {
        Err(ValidationError::new("Daily generation limit reached").into())
    }
}
