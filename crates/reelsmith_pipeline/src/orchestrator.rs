//! The orchestrator: owns the slot stores and batch state, and exposes the commands.

use crate::generator::{build_request, edit_job, image_job, video_job};
use crate::{
    BatchControl, BatchReport, BatchStatus, InMemoryHistoryLog, PipelineConfig, SlotGenerator,
    SlotJob, SlotOutcome, SlotStore, SnapshotAdapter, prompt,
};
use reelsmith_core::{
    ConfigSnapshot, GenerationMode, GenerationSlot, HistoryEntry, HistoryKind, MediaPayload,
    ProductionSettings, SnapshotValue, Stage, summarize,
};
use reelsmith_error::{
    CommandError, CommandErrorKind, ParseError, ParseErrorKind, ReelsmithErrorKind,
    ReelsmithResult, ServiceError, ServiceErrorKind, ValidationError,
};
use reelsmith_interface::{GenerationService, HistoryLog, OpenGate, UsageGate};
use reelsmith_storage::{MemorySnapshotStore, SnapshotStore};
use reelsmith_storyboard::Storyboard;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Snapshot key for the storyboard text.
const STORYBOARD_FIELD: &str = "storyboard";

/// Inputs shared by every generation of a session.
#[derive(Debug, Default)]
struct Session {
    settings: ProductionSettings,
    storyboard: Option<Storyboard>,
    product_image: Option<MediaPayload>,
    face_image: Option<MediaPayload>,
}

/// Read-only copy of everything a UI renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineView {
    /// Image slots, in index order
    pub images: Vec<GenerationSlot>,
    /// Video slots, in index order
    pub videos: Vec<GenerationSlot>,
    /// Current storyboard
    pub storyboard: Option<Storyboard>,
    /// Current production settings
    pub settings: ProductionSettings,
    /// Batch state
    pub batch: BatchStatus,
}

/// Generation orchestration engine.
///
/// Owns one [`SlotStore`] per stage, the batch state, and the session inputs. The UI
/// issues commands and reads [`Orchestrator::view`]; nothing else mutates slots.
///
/// Every command takes `&self`, so a batch and a manual command can be in flight at
/// the same time. No lock is held across a service call.
///
/// # Example
///
/// ```no_run
/// use reelsmith_core::{MediaPayload, Stage};
/// use reelsmith_interface::GenerationService;
/// use reelsmith_pipeline::{Orchestrator, PipelineConfig};
///
/// # async fn example(service: impl GenerationService) -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = Orchestrator::new(service, PipelineConfig::default());
/// orchestrator.set_reference_media(Some(MediaPayload::new("image/png", vec![1])), None);
/// orchestrator.update_settings(|s| {
///     *s = s.clone().with_product_description("Cold brew".to_string());
/// });
///
/// orchestrator.generate_storyboard().await?;
/// let report = orchestrator.start_batch(Stage::Image).await?;
/// println!("{} images ready", report.ready().len());
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<G: GenerationService> {
    service: G,
    history: Box<dyn HistoryLog>,
    gate: Box<dyn UsageGate>,
    snapshots: SnapshotAdapter,
    config: PipelineConfig,
    images: Mutex<SlotStore>,
    videos: Mutex<SlotStore>,
    session: Mutex<Session>,
    batch: BatchControl,
}

impl<G: GenerationService> Orchestrator<G> {
    /// Create an orchestrator with an in-memory history log and snapshot store.
    pub fn new(service: G, config: PipelineConfig) -> Self {
        let store = Arc::new(MemorySnapshotStore::with_limit(*config.max_snapshot_bytes()));
        let snapshots = SnapshotAdapter::new(store, config.snapshot_key().clone());
        let slot_count = *config.slot_count();

        debug!(slot_count, provider = service.provider_name(), "Created orchestrator");
        Self {
            service,
            history: Box::new(InMemoryHistoryLog::new()),
            gate: Box::new(OpenGate),
            snapshots,
            config,
            images: Mutex::new(SlotStore::new(Stage::Image, slot_count)),
            videos: Mutex::new(SlotStore::new(Stage::Video, slot_count)),
            session: Mutex::new(Session::default()),
            batch: BatchControl::new(),
        }
    }

    /// Use `history` for successful generations.
    pub fn with_history_log(mut self, history: Box<dyn HistoryLog>) -> Self {
        self.history = history;
        self
    }

    /// Consult `gate` before starting work.
    pub fn with_usage_gate(mut self, gate: Box<dyn UsageGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Persist snapshots in `store`, restoring any snapshot already there.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = SnapshotAdapter::new(store, self.config.snapshot_key().clone());
        self.restore();
        self
    }

    /// Merge the stored snapshot into the session.
    ///
    /// Fields missing from the snapshot, or malformed in it, keep their current
    /// values. Returns whether a snapshot was found.
    #[instrument(skip(self))]
    pub fn restore(&self) -> bool {
        let Some(snapshot) = self.snapshots.load() else {
            return false;
        };

        let mut session = self.lock_session();
        session.settings.merge_snapshot(&snapshot);
        if let Some(text) = snapshot.get(STORYBOARD_FIELD).and_then(SnapshotValue::as_text) {
            session.storyboard = Some(Storyboard::parse(
                text,
                *session.settings.storyboard_language(),
                *self.config.slot_count(),
            ));
        }
        info!(fields = snapshot.len(), "Restored session snapshot");
        true
    }

    /// Effective configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Generation service.
    pub fn service(&self) -> &G {
        &self.service
    }

    /// Read-only copy of slots, storyboard, settings and batch state.
    pub fn view(&self) -> PipelineView {
        let (settings, storyboard) = {
            let session = self.lock_session();
            (session.settings.clone(), session.storyboard.clone())
        };
        PipelineView {
            images: self.lock_store(Stage::Image).slots().to_vec(),
            videos: self.lock_store(Stage::Video).slots().to_vec(),
            storyboard,
            settings,
            batch: self.batch.status(),
        }
    }

    /// Copy of one slot.
    pub fn slot(&self, stage: Stage, index: usize) -> Option<GenerationSlot> {
        self.lock_store(stage).get(index).cloned()
    }

    /// Batch state.
    pub fn batch_status(&self) -> BatchStatus {
        self.batch.status()
    }

    /// Current production settings.
    pub fn settings(&self) -> ProductionSettings {
        self.lock_session().settings.clone()
    }

    /// Current storyboard.
    pub fn storyboard(&self) -> Option<Storyboard> {
        self.lock_session().storyboard.clone()
    }

    /// Replace the reference images. They are held in memory only.
    pub fn set_reference_media(&self, product: Option<MediaPayload>, face: Option<MediaPayload>) {
        let mut session = self.lock_session();
        session.product_image = product;
        session.face_image = face;
        debug!(
            product = session.product_image.is_some(),
            face = session.face_image.is_some(),
            "Reference media updated"
        );
    }

    /// Change the production settings, then save the snapshot.
    pub fn update_settings(&self, change: impl FnOnce(&mut ProductionSettings)) {
        {
            let mut session = self.lock_session();
            change(&mut session.settings);
        }
        self.save_snapshot();
    }

    /// Generate a storyboard from the product description and reference images.
    ///
    /// Resets both slot stores. Text without scene markers is kept as the storyboard
    /// but reported as a `ParseError`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` when the description or a required image is missing, or the
    ///   usage gate refuses
    /// - `ServiceError` when the call fails or returns no text
    /// - `CommandError` when a generation is in flight
    /// - `ParseError` when the result has no scene markers
    #[instrument(skip(self))]
    pub async fn generate_storyboard(&self) -> ReelsmithResult<Storyboard> {
        self.gate.check(None)?;

        let (request, description) = {
            let session = self.lock_session();
            let settings = &session.settings;
            if settings.product_description().trim().is_empty() {
                return Err(ValidationError::new("Provide a product description").into());
            }
            let product = session
                .product_image
                .clone()
                .ok_or_else(|| ValidationError::new("Upload a product image first"))?;
            let mut reference_media = vec![product];
            if *settings.include_model() {
                let face = session.face_image.clone().ok_or_else(|| {
                    ValidationError::new("Upload a face image or turn off the model option")
                })?;
                reference_media.push(face);
            }

            let request = build_request(
                GenerationMode::Text,
                prompt::storyboard_prompt(settings, *self.config.slot_count()),
                reference_media,
                None,
            )?;
            (request, settings.product_description().clone())
        };
        self.ensure_idle()?;

        let response = self.service.generate(&request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| {
                ServiceError::new(ServiceErrorKind::EmptyResult(
                    "The service did not return a storyboard.".to_string(),
                ))
            })?
            .to_string();

        self.reset_stores()?;
        let storyboard = self.install_storyboard(&text);
        self.record_history(HistoryEntry::text(
            HistoryKind::Storyboard,
            summarize("Product Review: ", &description),
            text,
        ))
        .await;
        self.save_snapshot();

        info!(scenes = storyboard.len(), "Storyboard generated");
        Self::require_scenes(storyboard)
    }

    /// Install user-supplied storyboard text.
    ///
    /// # Errors
    ///
    /// `CommandError` when a generation is in flight; `ParseError` when the text has
    /// no scene markers (the text is still installed).
    #[instrument(skip(self, text))]
    pub fn load_storyboard(&self, text: &str) -> ReelsmithResult<Storyboard> {
        self.reset_stores()?;
        let storyboard = self.install_storyboard(text);
        self.save_snapshot();
        Self::require_scenes(storyboard)
    }

    /// Replace the raw text of one scene and re-sync the storyboard.
    ///
    /// Slots keep their results; the next generation for the scene uses the new text.
    ///
    /// # Errors
    ///
    /// `ParseErrorKind::SceneOutOfRange` when there is no such scene.
    #[instrument(skip(self, text))]
    pub fn edit_scene_text(&self, index: usize, text: &str) -> ReelsmithResult<()> {
        {
            let mut session = self.lock_session();
            let storyboard = session.storyboard.as_mut().ok_or_else(|| {
                ParseError::new(ParseErrorKind::SceneOutOfRange { index, count: 0 })
            })?;
            storyboard.edit_scene(index, text)?;
        }
        self.save_snapshot();
        Ok(())
    }

    /// Run a batch over every slot of `stage`.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::run_batch`].
    pub async fn start_batch(&self, stage: Stage) -> ReelsmithResult<BatchReport> {
        let indices: Vec<usize> = (0..*self.config.slot_count()).collect();
        self.run_batch(stage, &indices).await
    }

    /// Generate `indices` of `stage` one at a time, in order.
    ///
    /// Slots whose precondition is not met, or that already have a call in flight,
    /// are skipped untouched. A failed slot does not stop the batch. Cancellation is
    /// checked before each slot; the slot in flight when it is requested completes.
    ///
    /// # Errors
    ///
    /// Only blocking problems found before the first slot: a `ValidationError` for a
    /// missing storyboard or product image or a refusing usage gate, or a
    /// `CommandError` when another batch is running.
    #[instrument(skip(self, indices), fields(count = indices.len()))]
    pub async fn run_batch(&self, stage: Stage, indices: &[usize]) -> ReelsmithResult<BatchReport> {
        self.gate.check(Some(stage))?;
        self.check_batch_inputs(stage)?;

        let guard = self
            .batch
            .try_begin(stage)
            .ok_or_else(|| CommandError::new(CommandErrorKind::BatchActive))?;
        let mut report = BatchReport::begin(stage);
        info!(batch_id = %report.batch_id(), "Batch started");

        let generator = self.generator(stage);
        for (position, &index) in indices.iter().enumerate() {
            if guard.cancel_requested() {
                info!(batch_id = %report.batch_id(), index, "Batch cancelled");
                report.cancel(&indices[position..]);
                break;
            }
            guard.set_cursor(Some(index));

            let job = match self.prepare_job(stage, index) {
                Ok(job) => job,
                Err(e) => {
                    debug!(index, reason = %e.message, "Skipping ineligible slot");
                    report.record_skipped(index);
                    continue;
                }
            };

            match generator.generate(index, Ok(job)).await {
                Ok(SlotOutcome::Ready(_)) => report.record_ready(index),
                Ok(SlotOutcome::Failed { .. }) => report.record_failed(index),
                Err(e) if matches!(e.kind(), ReelsmithErrorKind::Command(_)) => {
                    debug!(index, "Skipping slot already in flight");
                    report.record_skipped(index);
                }
                Err(e) => return Err(e),
            }
        }
        drop(guard);

        let report = report.finish();
        info!(
            batch_id = %report.batch_id(),
            ready = report.ready().len(),
            failed = report.failed().len(),
            skipped = report.skipped().len(),
            cancelled = *report.cancelled(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Ask the running batch to stop before its next slot.
    ///
    /// Returns false when no batch is running.
    pub fn cancel_batch(&self) -> bool {
        self.batch.request_cancel()
    }

    /// Generate one slot on demand.
    ///
    /// An unmet precondition leaves the slot `Failed` with the validation message.
    ///
    /// # Errors
    ///
    /// `CommandError` while any batch runs or when the slot is already `Pending`;
    /// `ValidationError` when the usage gate refuses; `SlotError` for an unknown index.
    #[instrument(skip(self))]
    pub async fn retry_slot(&self, stage: Stage, index: usize) -> ReelsmithResult<SlotOutcome> {
        self.gate.check(Some(stage))?;
        self.ensure_no_batch()?;

        let job = self.prepare_job(stage, index);
        self.generator(stage).generate(index, job).await
    }

    /// Edit the ready image in slot `index` with a free-text instruction.
    ///
    /// On success the image is replaced in place; on failure the slot is `Failed`.
    ///
    /// # Errors
    ///
    /// `CommandError` for a blank instruction, while any batch runs, or when the slot
    /// is already `Pending`; `ValidationError` when the usage gate refuses.
    #[instrument(skip(self, instruction))]
    pub async fn edit_slot(&self, index: usize, instruction: &str) -> ReelsmithResult<SlotOutcome> {
        if instruction.trim().is_empty() {
            return Err(CommandError::new(CommandErrorKind::EmptyInstruction).into());
        }
        self.gate.check(Some(Stage::Image))?;
        self.ensure_no_batch()?;

        let image = self
            .lock_store(Stage::Image)
            .get(index)
            .and_then(|slot| slot.ready_payload().cloned());
        let job = edit_job(index, image.as_ref(), instruction);
        self.generator(Stage::Image).generate(index, job).await
    }

    /// Clear slots, storyboard, settings, reference media and the stored snapshot.
    ///
    /// # Errors
    ///
    /// `CommandError` while a batch runs or any slot is `Pending`.
    #[instrument(skip(self))]
    pub fn reset_all(&self) -> ReelsmithResult<()> {
        self.reset_stores()?;
        *self.lock_session() = Session::default();
        self.snapshots.clear();
        info!("Session reset");
        Ok(())
    }

    fn generator(&self, stage: Stage) -> SlotGenerator<'_> {
        let generator = SlotGenerator::new(&self.service, self.store(stage));
        if *self.config.record_history() {
            generator.with_history(&*self.history)
        } else {
            generator
        }
    }

    fn prepare_job(&self, stage: Stage, index: usize) -> Result<SlotJob, ValidationError> {
        let session = self.lock_session();
        match stage {
            Stage::Image => image_job(
                index,
                &session.settings,
                session.storyboard.as_ref(),
                session.product_image.as_ref(),
                session.face_image.as_ref(),
            ),
            Stage::Video => {
                let image = self
                    .lock_store(Stage::Image)
                    .get(index)
                    .and_then(|slot| slot.ready_payload().cloned());
                video_job(
                    index,
                    &session.settings,
                    session.storyboard.as_ref(),
                    image.as_ref(),
                )
            }
        }
    }

    fn check_batch_inputs(&self, stage: Stage) -> ReelsmithResult<()> {
        let session = self.lock_session();
        if !session
            .storyboard
            .as_ref()
            .is_some_and(Storyboard::is_structured)
        {
            return Err(ValidationError::new("Generate or load a storyboard first").into());
        }
        if stage == Stage::Image && session.product_image.is_none() {
            return Err(ValidationError::new("Upload a product image first").into());
        }
        Ok(())
    }

    fn ensure_no_batch(&self) -> ReelsmithResult<()> {
        if self.batch.is_active() {
            return Err(CommandError::new(CommandErrorKind::BatchActive).into());
        }
        Ok(())
    }

    /// No batch running and no slot `Pending`.
    fn ensure_idle(&self) -> ReelsmithResult<()> {
        self.ensure_no_batch()?;
        for stage in Stage::iter() {
            if let Some(index) = self.lock_store(stage).first_pending() {
                return Err(CommandError::new(CommandErrorKind::SlotPending {
                    stage: stage.to_string(),
                    index,
                })
                .into());
            }
        }
        Ok(())
    }

    /// Reset both stores, refusing while anything is in flight.
    fn reset_stores(&self) -> ReelsmithResult<()> {
        self.ensure_no_batch()?;
        let slot_count = *self.config.slot_count();
        let mut images = self.lock_store(Stage::Image);
        let mut videos = self.lock_store(Stage::Video);
        for store in [&*images, &*videos] {
            if let Some(index) = store.first_pending() {
                return Err(CommandError::new(CommandErrorKind::SlotPending {
                    stage: store.stage().to_string(),
                    index,
                })
                .into());
            }
        }
        images.reset(slot_count);
        videos.reset(slot_count);
        Ok(())
    }

    fn install_storyboard(&self, text: &str) -> Storyboard {
        let mut session = self.lock_session();
        let storyboard = Storyboard::parse(
            text,
            *session.settings.storyboard_language(),
            *self.config.slot_count(),
        );
        session.storyboard = Some(storyboard.clone());
        storyboard
    }

    fn require_scenes(storyboard: Storyboard) -> ReelsmithResult<Storyboard> {
        if !storyboard.is_structured() {
            warn!("Storyboard has no scene markers");
            return Err(ParseError::new(ParseErrorKind::NoSceneMarkers).into());
        }
        Ok(storyboard)
    }

    async fn record_history(&self, entry: HistoryEntry) {
        if !*self.config.record_history() {
            return;
        }
        if let Err(e) = self.history.append(entry).await {
            warn!(error = %e, "Failed to record history entry");
        }
    }

    fn save_snapshot(&self) -> bool {
        let snapshot = {
            let session = self.lock_session();
            session_snapshot(&session)
        };
        self.snapshots.save(&snapshot)
    }

    fn store(&self, stage: Stage) -> &Mutex<SlotStore> {
        match stage {
            Stage::Image => &self.images,
            Stage::Video => &self.videos,
        }
    }

    fn lock_store(&self, stage: Stage) -> MutexGuard<'_, SlotStore> {
        self.store(stage)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settings plus storyboard text, when it fits.
fn session_snapshot(session: &Session) -> ConfigSnapshot {
    let mut snapshot = session.settings.to_snapshot();
    if let Some(storyboard) = &session.storyboard {
        if let Err(e) = snapshot.insert_text(STORYBOARD_FIELD, storyboard.text().clone()) {
            debug!(error = %e, "Leaving storyboard out of snapshot");
        }
    }
    snapshot
}
