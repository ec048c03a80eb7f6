//! Batch run state: the single-active-batch flag, cursor and cancellation.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use reelsmith_core::Stage;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};
use uuid::Uuid;

/// Read-only view of the batch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BatchStatus {
    /// A batch is running
    pub active: bool,
    /// Stage of the running batch
    pub stage: Option<Stage>,
    /// Slot currently being processed
    pub cursor: Option<usize>,
    /// Cancellation has been requested for the running batch
    pub cancel_requested: bool,
}

#[derive(Debug, Default)]
struct RunState {
    stage: Option<Stage>,
    cursor: Option<usize>,
}

/// Shared batch state.
///
/// At most one batch runs at a time: [`BatchControl::try_begin`] hands out a
/// [`BatchGuard`] only when no batch is active, and dropping the guard ends the
/// batch. Cancellation is cooperative: [`BatchControl::request_cancel`] only sets a
/// flag that the runner reads between slots.
#[derive(Debug, Default)]
pub struct BatchControl {
    active: AtomicBool,
    cancel_requested: AtomicBool,
    state: Mutex<RunState>,
}

impl BatchControl {
    /// Creates an idle control.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a batch for `stage`, unless one is already running.
    pub fn try_begin(&self, stage: Stage) -> Option<BatchGuard<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        self.cancel_requested.store(false, Ordering::Release);
        *self.lock() = RunState {
            stage: Some(stage),
            cursor: None,
        };
        debug!(%stage, "Batch started");
        Some(BatchGuard { control: self })
    }

    /// Ask the running batch to stop before its next slot.
    ///
    /// Returns false when no batch is running.
    pub fn request_cancel(&self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.cancel_requested.store(true, Ordering::Release);
        info!("Batch cancellation requested");
        true
    }

    /// True while a batch runs.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Current status.
    pub fn status(&self) -> BatchStatus {
        let state = self.lock();
        BatchStatus {
            active: self.is_active(),
            stage: state.stage,
            cursor: state.cursor,
            cancel_requested: self.cancel_requested.load(Ordering::Acquire),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RunState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof of the running batch; ends it when dropped.
#[derive(Debug)]
pub struct BatchGuard<'a> {
    control: &'a BatchControl,
}

impl BatchGuard<'_> {
    /// True once cancellation has been requested.
    pub fn cancel_requested(&self) -> bool {
        self.control.cancel_requested.load(Ordering::Acquire)
    }

    /// Record the slot being processed.
    pub fn set_cursor(&self, cursor: Option<usize>) {
        self.control.lock().cursor = cursor;
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        *self.control.lock() = RunState::default();
        self.control.cancel_requested.store(false, Ordering::Release);
        self.control.active.store(false, Ordering::Release);
        debug!("Batch ended");
    }
}

/// What a finished batch did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct BatchReport {
    /// Identifier for log correlation
    batch_id: Uuid,
    /// Stage processed
    stage: Stage,
    /// When the batch started
    started_at: DateTime<Utc>,
    /// When the batch finished
    finished_at: DateTime<Utc>,
    /// Slots that ended `Ready`
    ready: Vec<usize>,
    /// Slots that ended `Failed`
    failed: Vec<usize>,
    /// Slots skipped because a precondition was not met or a call was already in flight
    skipped: Vec<usize>,
    /// Slots not started because the batch was cancelled
    not_started: Vec<usize>,
    /// The batch stopped early
    cancelled: bool,
}

impl BatchReport {
    pub(crate) fn begin(stage: Stage) -> Self {
        let now = Utc::now();
        Self {
            batch_id: Uuid::new_v4(),
            stage,
            started_at: now,
            finished_at: now,
            ready: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            not_started: Vec::new(),
            cancelled: false,
        }
    }

    pub(crate) fn record_ready(&mut self, index: usize) {
        self.ready.push(index);
    }

    pub(crate) fn record_failed(&mut self, index: usize) {
        self.failed.push(index);
    }

    pub(crate) fn record_skipped(&mut self, index: usize) {
        self.skipped.push(index);
    }

    pub(crate) fn cancel(&mut self, remaining: &[usize]) {
        self.cancelled = true;
        self.not_started.extend_from_slice(remaining);
    }

    pub(crate) fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}
