//! Generation slots.

use crate::MediaPayload;
use serde::{Deserialize, Serialize};

/// Lifecycle of a single generation slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    /// Nothing generated yet
    #[default]
    Empty,
    /// A generation call is in flight
    Pending,
    /// Holds a payload
    Ready,
    /// Holds an error message
    Failed,
}

/// Pipeline stage a slot belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Per-scene image composed from the reference media
    Image,
    /// Per-scene video animated from the scene image
    Video,
}

/// One position in the fixed-size generation pipeline.
///
/// Outside `Empty` and `Pending`, exactly one of payload and error is populated.
/// Only the slot store in `reelsmith_pipeline` changes a slot.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{GenerationSlot, SlotStatus};
///
/// let slot = GenerationSlot::empty(2);
/// assert_eq!(*slot.index(), 2);
/// assert_eq!(*slot.status(), SlotStatus::Empty);
/// assert!(slot.payload().is_none());
/// assert!(slot.error().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GenerationSlot {
    /// Stable position, 0..N-1
    index: usize,
    /// Current lifecycle state
    status: SlotStatus,
    /// Result when `Ready`
    payload: Option<MediaPayload>,
    /// Message when `Failed`
    error: Option<String>,
}

impl GenerationSlot {
    /// A slot with nothing in it.
    pub fn empty(index: usize) -> Self {
        Self {
            index,
            status: SlotStatus::Empty,
            payload: None,
            error: None,
        }
    }

    /// A slot with a call in flight.
    pub fn pending(index: usize) -> Self {
        Self {
            status: SlotStatus::Pending,
            ..Self::empty(index)
        }
    }

    /// A slot holding a result.
    pub fn ready(index: usize, payload: MediaPayload) -> Self {
        Self {
            index,
            status: SlotStatus::Ready,
            payload: Some(payload),
            error: None,
        }
    }

    /// A slot holding an error message.
    pub fn failed(index: usize, error: impl Into<String>) -> Self {
        Self {
            index,
            status: SlotStatus::Failed,
            payload: None,
            error: Some(error.into()),
        }
    }

    /// True while a call is in flight.
    pub fn is_pending(&self) -> bool {
        self.status == SlotStatus::Pending
    }

    /// Payload if the slot is `Ready`.
    pub fn ready_payload(&self) -> Option<&MediaPayload> {
        match self.status {
            SlotStatus::Ready => self.payload.as_ref(),
            _ => None,
        }
    }
}
