//! The single-slot generator.
//!
//! A [`SlotJob`] is the fully assembled request for one slot, built by
//! [`image_job`], [`video_job`] or [`edit_job`] from a read-only view of the
//! session. Job builders report unmet preconditions as a `ValidationError`
//! without touching any slot; the batch runner uses that to skip ineligible slots.

use crate::SlotStore;
use crate::prompt::{edit_prompt, image_prompt, negative_prompt, video_prompt};
use derive_getters::Getters;
use reelsmith_core::{
    GenerationMode, GenerationRequest, HistoryEntry, HistoryKind, MediaPayload,
    ProductionSettings, Stage, VideoOptions, summarize,
};
use reelsmith_error::{
    ReelsmithError, ReelsmithResult, ServiceError, ServiceErrorKind, ValidationError,
};
use reelsmith_interface::{GenerationService, HistoryLog};
use reelsmith_storyboard::{SceneRecord, Storyboard};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument, warn};

/// One assembled generation for one slot.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct SlotJob {
    /// Stage whose slot receives the result
    stage: Stage,
    /// Kind recorded in the history log
    kind: HistoryKind,
    /// Request sent to the generation service
    request: GenerationRequest,
    /// History log summary
    summary: String,
    /// Message used when the service returns nothing usable
    #[getter(skip)]
    empty_message: &'static str,
}

pub(crate) fn build_request(
    mode: GenerationMode,
    prompt: String,
    reference_media: Vec<MediaPayload>,
    video: Option<VideoOptions>,
) -> Result<GenerationRequest, ValidationError> {
    GenerationRequest::builder()
        .mode(mode)
        .prompt(prompt)
        .reference_media(reference_media)
        .video(video)
        .build()
        .map_err(|e| ValidationError::new(format!("Incomplete generation request: {e}")))
}

fn scene_for(storyboard: Option<&Storyboard>, index: usize) -> Result<&SceneRecord, ValidationError> {
    storyboard
        .and_then(|storyboard| storyboard.scene(index))
        .ok_or_else(|| ValidationError::new(format!("Scene {} has no storyboard text", index + 1)))
}

/// Job composing the image for scene `index` from the reference images.
///
/// # Errors
///
/// A `ValidationError` when the scene is missing, has no visual description, or no
/// product image has been provided.
pub fn image_job(
    index: usize,
    settings: &ProductionSettings,
    storyboard: Option<&Storyboard>,
    product_image: Option<&MediaPayload>,
    face_image: Option<&MediaPayload>,
) -> Result<SlotJob, ValidationError> {
    let scene = scene_for(storyboard, index)?;
    let fields = scene.fields();
    if fields.visual_description().is_empty() {
        return Err(ValidationError::new(format!(
            "Scene {} has no visual description",
            index + 1
        )));
    }
    let product = product_image.ok_or_else(|| ValidationError::new("Upload a product image first"))?;

    let mut reference_media = vec![product.clone()];
    if *settings.include_model() {
        if let Some(face) = face_image {
            reference_media.push(face.clone());
        }
    }

    Ok(SlotJob {
        stage: Stage::Image,
        kind: HistoryKind::Image,
        request: build_request(
            GenerationMode::ImageComposition,
            image_prompt(settings, &fields),
            reference_media,
            None,
        )?,
        summary: summarize(
            &format!("Storyboard Scene {}: ", index + 1),
            scene.raw_text(),
        ),
        empty_message: "The service did not return an image. Please try a different prompt.",
    })
}

/// Job animating the ready image of slot `index` into a video.
///
/// # Errors
///
/// A `ValidationError` when the scene is missing or its image is not `Ready`.
pub fn video_job(
    index: usize,
    settings: &ProductionSettings,
    storyboard: Option<&Storyboard>,
    image: Option<&MediaPayload>,
) -> Result<SlotJob, ValidationError> {
    let scene = scene_for(storyboard, index)?;
    let image = image.ok_or_else(|| {
        ValidationError::new(format!("Generate the image for scene {} first", index + 1))
    })?;

    let options = VideoOptions::new(
        *settings.aspect_ratio(),
        *settings.resolution(),
        Some(negative_prompt(*settings.video_language())),
    );

    Ok(SlotJob {
        stage: Stage::Video,
        kind: HistoryKind::Video,
        request: build_request(
            GenerationMode::Video,
            video_prompt(settings, &scene.fields()),
            vec![image.clone()],
            Some(options),
        )?,
        summary: format!("Scene {} Video", index + 1),
        empty_message: "Video generation returned no result.",
    })
}

/// Job editing the ready image of slot `index` with a free-text instruction.
///
/// # Errors
///
/// A `ValidationError` when the slot has no ready image or the instruction is blank.
pub fn edit_job(
    index: usize,
    image: Option<&MediaPayload>,
    instruction: &str,
) -> Result<SlotJob, ValidationError> {
    let image = image.ok_or_else(|| {
        ValidationError::new(format!("Scene {} has no image to edit", index + 1))
    })?;
    if instruction.trim().is_empty() {
        return Err(ValidationError::new("Edit instruction is empty"));
    }

    Ok(SlotJob {
        stage: Stage::Image,
        kind: HistoryKind::Image,
        request: build_request(
            GenerationMode::ImageEdit,
            edit_prompt(instruction),
            vec![image.clone()],
            None,
        )?,
        summary: format!("Edited Storyboard Scene {}: {}", index + 1, instruction.trim()),
        empty_message: "The service did not return an edited image. Please try a different prompt.",
    })
}

/// Why a slot ended up `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FailureReason {
    /// A precondition was not met; the service was not called
    Validation,
    /// The service failed or returned nothing usable
    Service,
}

/// Result of one slot generation.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    /// The slot is `Ready` with this payload
    Ready(MediaPayload),
    /// The slot is `Failed` with this message
    Failed {
        /// Failure category
        reason: FailureReason,
        /// Message stored on the slot
        message: String,
    },
}

impl SlotOutcome {
    /// True for `Ready`.
    pub fn is_ready(&self) -> bool {
        matches!(self, SlotOutcome::Ready(_))
    }
}

/// Runs one generation against one slot.
pub struct SlotGenerator<'a> {
    service: &'a dyn GenerationService,
    slots: &'a Mutex<SlotStore>,
    history: Option<&'a dyn HistoryLog>,
}

impl<'a> SlotGenerator<'a> {
    /// Generator writing into `slots`.
    pub fn new(service: &'a dyn GenerationService, slots: &'a Mutex<SlotStore>) -> Self {
        Self {
            service,
            slots,
            history: None,
        }
    }

    /// Record successes in `history`.
    pub fn with_history(mut self, history: &'a dyn HistoryLog) -> Self {
        self.history = Some(history);
        self
    }

    /// Claim slot `index`, run `job`, and store the result.
    ///
    /// The slot is marked `Pending` before anything else, so an unmet precondition
    /// shows up as `Pending -> Failed` without a service call. Business failures come
    /// back as `SlotOutcome::Failed`; `Err` is reserved for slot store misuse,
    /// including a slot that is already `Pending`.
    ///
    /// If the returned future is dropped before the call completes, the slot is
    /// failed with [`INTERRUPTED_MESSAGE`] so it can be retried.
    #[instrument(skip(self, job), fields(stage = %self.stage(), provider = self.service.provider_name()))]
    pub async fn generate(
        &self,
        index: usize,
        job: Result<SlotJob, ValidationError>,
    ) -> ReelsmithResult<SlotOutcome> {
        self.lock().claim(index)?;
        let claim = PendingClaim::new(self.slots, index);

        let job = match job {
            Ok(job) => job,
            Err(e) => {
                debug!(error = %e.message, "Precondition not met");
                claim.fail(e.message.clone())?;
                return Ok(SlotOutcome::Failed {
                    reason: FailureReason::Validation,
                    message: e.message,
                });
            }
        };

        let mode = *job.request().mode();
        if !self.service.supports(mode) {
            let error = ServiceError::new(ServiceErrorKind::Unsupported(format!(
                "{} does not support {}",
                self.service.provider_name(),
                mode
            )));
            return record_failure(claim, error.into());
        }

        let result = self.service.generate(job.request()).await;

        let payload = match result {
            Ok(response) => match response.first_media() {
                Some(payload) => payload.clone(),
                None => {
                    let error = ServiceError::new(ServiceErrorKind::EmptyResult(
                        job.empty_message.to_string(),
                    ));
                    return record_failure(claim, error.into());
                }
            },
            Err(e) => return record_failure(claim, e),
        };

        claim.resolve(payload.clone())?;

        if let Some(history) = self.history {
            let entry = HistoryEntry::media(job.kind, job.summary.clone(), payload.clone());
            if let Err(e) = history.append(entry).await {
                warn!(index, error = %e, "Failed to record history entry");
            }
        }

        Ok(SlotOutcome::Ready(payload))
    }

    fn stage(&self) -> Stage {
        self.lock().stage()
    }

    fn lock(&self) -> MutexGuard<'a, SlotStore> {
        lock_slots(self.slots)
    }
}

fn record_failure(claim: PendingClaim<'_>, error: ReelsmithError) -> ReelsmithResult<SlotOutcome> {
    let message = error.user_message();
    warn!(index = claim.index, error = %error, "Generation failed");
    claim.fail(message.clone())?;
    Ok(SlotOutcome::Failed {
        reason: FailureReason::Service,
        message,
    })
}

fn lock_slots(slots: &Mutex<SlotStore>) -> MutexGuard<'_, SlotStore> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Message stored on a slot whose generation was dropped mid-flight.
pub const INTERRUPTED_MESSAGE: &str = "Generation was interrupted. Please try again.";

/// A claimed `Pending` slot awaiting its result.
///
/// Settled through [`PendingClaim::resolve`] or [`PendingClaim::fail`]. Dropping an
/// unsettled claim fails the slot.
struct PendingClaim<'a> {
    slots: &'a Mutex<SlotStore>,
    index: usize,
    settled: bool,
}

impl<'a> PendingClaim<'a> {
    fn new(slots: &'a Mutex<SlotStore>, index: usize) -> Self {
        Self {
            slots,
            index,
            settled: false,
        }
    }

    fn resolve(mut self, payload: MediaPayload) -> ReelsmithResult<()> {
        self.settled = true;
        lock_slots(self.slots).resolve(self.index, payload)
    }

    fn fail(mut self, message: impl Into<String>) -> ReelsmithResult<()> {
        self.settled = true;
        lock_slots(self.slots).fail(self.index, message)
    }
}

impl Drop for PendingClaim<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut store = lock_slots(self.slots);
        if store.get(self.index).is_some_and(|slot| slot.is_pending()) {
            warn!(stage = %store.stage(), index = self.index, "Generation dropped before completion");
            if let Err(e) = store.fail(self.index, INTERRUPTED_MESSAGE) {
                warn!(index = self.index, error = %e, "Failed to release interrupted slot");
            }
        }
    }
}
