//! The slot store: fixed-length slot array for one pipeline stage.

use reelsmith_core::{GenerationSlot, MediaPayload, SlotStatus, Stage};
use reelsmith_error::{
    CommandError, CommandErrorKind, ReelsmithResult, SlotError, SlotErrorKind,
};
use tracing::debug;

/// Fixed-length array of generation slots for one stage.
///
/// The only legal transitions are `* -> Pending` ([`SlotStore::mark_pending`]),
/// `Pending -> Ready` ([`SlotStore::resolve`]), `Pending -> Failed`
/// ([`SlotStore::fail`]) and `* -> Empty` for every slot at once
/// ([`SlotStore::reset`]). Anything else is a `SlotError`.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{MediaPayload, SlotStatus, Stage};
/// use reelsmith_pipeline::SlotStore;
///
/// let mut store = SlotStore::new(Stage::Image, 4);
/// store.mark_pending(1).unwrap();
/// store.resolve(1, MediaPayload::new("image/png", vec![1])).unwrap();
/// assert_eq!(*store.get(1).unwrap().status(), SlotStatus::Ready);
///
/// // Resolving a slot that is not pending is a programming error
/// assert!(store.resolve(2, MediaPayload::new("image/png", vec![1])).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStore {
    stage: Stage,
    slots: Vec<GenerationSlot>,
}

impl SlotStore {
    /// Creates `len` empty slots for `stage`.
    pub fn new(stage: Stage, len: usize) -> Self {
        Self {
            stage,
            slots: (0..len).map(GenerationSlot::empty).collect(),
        }
    }

    /// Stage this store belongs to.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// All slots, in index order.
    pub fn slots(&self) -> &[GenerationSlot] {
        &self.slots
    }

    /// Slot `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&GenerationSlot> {
        self.slots.get(index)
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the store has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First slot with a call in flight.
    pub fn first_pending(&self) -> Option<usize> {
        self.slots.iter().position(GenerationSlot::is_pending)
    }

    /// Set all `len` slots to `Empty`.
    pub fn reset(&mut self, len: usize) {
        debug!(stage = %self.stage, len, "Resetting slots");
        self.slots = (0..len).map(GenerationSlot::empty).collect();
    }

    /// `* -> Pending`.
    ///
    /// # Errors
    ///
    /// Returns `SlotErrorKind::OutOfRange` for an unknown index.
    pub fn mark_pending(&mut self, index: usize) -> ReelsmithResult<()> {
        self.check_index(index)?;
        debug!(stage = %self.stage, index, "Slot pending");
        self.slots[index] = GenerationSlot::pending(index);
        Ok(())
    }

    /// `* -> Pending`, refusing a slot that is already `Pending`.
    ///
    /// Used to keep two writers off the same slot.
    ///
    /// # Errors
    ///
    /// Returns `CommandErrorKind::SlotPending` if the slot already has a call in flight.
    pub fn claim(&mut self, index: usize) -> ReelsmithResult<()> {
        self.check_index(index)?;
        if self.slots[index].is_pending() {
            return Err(CommandError::new(CommandErrorKind::SlotPending {
                stage: self.stage.to_string(),
                index,
            })
            .into());
        }
        self.mark_pending(index)
    }

    /// `Pending -> Ready`.
    ///
    /// # Errors
    ///
    /// Returns a `SlotError` if the slot is not `Pending` or the index is unknown.
    pub fn resolve(&mut self, index: usize, payload: MediaPayload) -> ReelsmithResult<()> {
        self.check_pending(index, SlotStatus::Ready)?;
        debug!(stage = %self.stage, index, bytes = payload.len(), "Slot ready");
        self.slots[index] = GenerationSlot::ready(index, payload);
        Ok(())
    }

    /// `Pending -> Failed`.
    ///
    /// # Errors
    ///
    /// Returns a `SlotError` if the slot is not `Pending` or the index is unknown.
    pub fn fail(&mut self, index: usize, error: impl Into<String>) -> ReelsmithResult<()> {
        self.check_pending(index, SlotStatus::Failed)?;
        let error = error.into();
        debug!(stage = %self.stage, index, error = %error, "Slot failed");
        self.slots[index] = GenerationSlot::failed(index, error);
        Ok(())
    }

    fn check_index(&self, index: usize) -> ReelsmithResult<()> {
        if index >= self.slots.len() {
            return Err(SlotError::new(SlotErrorKind::OutOfRange {
                index,
                len: self.slots.len(),
            })
            .into());
        }
        Ok(())
    }

    fn check_pending(&self, index: usize, to: SlotStatus) -> ReelsmithResult<()> {
        self.check_index(index)?;
        let from = *self.slots[index].status();
        if from != SlotStatus::Pending {
            return Err(SlotError::new(SlotErrorKind::IllegalTransition {
                index,
                from: from.to_string(),
                to: to.to_string(),
            })
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_error::ReelsmithErrorKind;

    fn png() -> MediaPayload {
        MediaPayload::new("image/png", vec![1, 2, 3])
    }

    #[test]
    fn test_pending_from_any_state() {
        let mut store = SlotStore::new(Stage::Image, 2);

        store.mark_pending(0).unwrap();
        store.resolve(0, png()).unwrap();
        store.mark_pending(0).unwrap();
        assert!(store.get(0).unwrap().payload().is_none());

        store.fail(0, "boom").unwrap();
        store.mark_pending(0).unwrap();
        assert!(store.get(0).unwrap().error().is_none());
    }

    #[test]
    fn test_fail_clears_payload_and_resolve_clears_error() {
        let mut store = SlotStore::new(Stage::Video, 1);

        store.mark_pending(0).unwrap();
        store.resolve(0, png()).unwrap();
        store.mark_pending(0).unwrap();
        store.fail(0, "nope").unwrap();
        let slot = store.get(0).unwrap();
        assert!(slot.payload().is_none());
        assert_eq!(slot.error().as_deref(), Some("nope"));

        store.mark_pending(0).unwrap();
        store.resolve(0, png()).unwrap();
        assert!(store.get(0).unwrap().error().is_none());
    }

    #[test]
    fn test_illegal_transitions() {
        let mut store = SlotStore::new(Stage::Image, 1);

        let err = store.fail(0, "x").unwrap_err();
        match err.kind() {
            ReelsmithErrorKind::Slot(e) => assert_eq!(
                e.kind,
                SlotErrorKind::IllegalTransition {
                    index: 0,
                    from: "empty".to_string(),
                    to: "failed".to_string(),
                }
            ),
            other => panic!("unexpected error: {other}"),
        }

        store.mark_pending(0).unwrap();
        store.resolve(0, png()).unwrap();
        assert!(store.resolve(0, png()).is_err());
    }

    #[test]
    fn test_out_of_range() {
        let mut store = SlotStore::new(Stage::Image, 4);
        assert!(matches!(
            store.mark_pending(4).unwrap_err().kind(),
            ReelsmithErrorKind::Slot(_)
        ));
    }

    #[test]
    fn test_claim_refuses_pending_slot() {
        let mut store = SlotStore::new(Stage::Image, 2);
        store.claim(1).unwrap();
        assert!(matches!(
            store.claim(1).unwrap_err().kind(),
            ReelsmithErrorKind::Command(_)
        ));
        assert_eq!(store.first_pending(), Some(1));
    }

    #[test]
    fn test_reset() {
        let mut store = SlotStore::new(Stage::Image, 2);
        store.mark_pending(0).unwrap();
        store.reset(3);
        assert_eq!(store.len(), 3);
        assert!(
            store
                .slots()
                .iter()
                .all(|slot| *slot.status() == SlotStatus::Empty)
        );
    }
}
