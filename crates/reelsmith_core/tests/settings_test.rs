use reelsmith_core::{AspectRatio, ConfigSnapshot, Language, ProductionSettings, Resolution};

fn customised() -> ProductionSettings {
    ProductionSettings::default()
        .with_product_description("Matte lipstick, shade 04".to_string())
        .with_vibe("Cinematic & Epic".to_string())
        .with_include_model(true)
        .with_include_captions(true)
        .with_creativity_level(8)
        .with_aspect_ratio(AspectRatio::Landscape)
        .with_resolution(Resolution::FullHd)
        .with_storyboard_language(Language::Chinese)
        .with_video_language(Language::English)
}

#[test]
fn snapshot_round_trip_restores_every_field() {
    let settings = customised();
    let json = settings.to_snapshot().to_json_string().unwrap();

    let mut restored = ProductionSettings::default();
    restored.merge_snapshot(&ConfigSnapshot::from_json_str(&json).unwrap());

    assert_eq!(restored, settings);
}

#[test]
fn empty_snapshot_keeps_defaults() {
    let mut settings = ProductionSettings::default();
    settings.merge_snapshot(&ConfigSnapshot::new());
    assert_eq!(settings, ProductionSettings::default());
}

#[test]
fn oversized_description_is_left_out() {
    let settings = ProductionSettings::default()
        .with_product_description("x".repeat(reelsmith_core::MAX_SNAPSHOT_TEXT_BYTES + 1));

    let snapshot = settings.to_snapshot();
    assert!(snapshot.get("product_description").is_none());
    assert!(snapshot.get("vibe").is_some());
}
