use reelsmith_core::{GenerationSlot, MediaPayload, SlotStatus, Stage};

#[test]
fn ready_slot_exposes_payload_only() {
    let payload = MediaPayload::new("image/png", vec![1, 2, 3]);
    let slot = GenerationSlot::ready(1, payload.clone());

    assert_eq!(*slot.status(), SlotStatus::Ready);
    assert_eq!(slot.ready_payload(), Some(&payload));
    assert!(slot.error().is_none());
}

#[test]
fn failed_slot_exposes_error_only() {
    let slot = GenerationSlot::failed(3, "The AI did not return an image");

    assert_eq!(*slot.status(), SlotStatus::Failed);
    assert!(slot.payload().is_none());
    assert!(slot.ready_payload().is_none());
    assert_eq!(slot.error().as_deref(), Some("The AI did not return an image"));
}

#[test]
fn stage_names_parse() {
    assert_eq!("image".parse::<Stage>().unwrap(), Stage::Image);
    assert_eq!(Stage::Video.to_string(), "video");
    assert_eq!(SlotStatus::Pending.to_string(), "pending");
}
