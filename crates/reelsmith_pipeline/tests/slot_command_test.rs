//! Retry, edit, history and storyboard commands.

mod test_utils;

use reelsmith_core::{
    GenerationMode, HistoryKind, HistoryResult, Language, SlotStatus, Stage,
};
use reelsmith_error::{CommandErrorKind, ParseErrorKind, ReelsmithErrorKind};
use reelsmith_pipeline::{
    FailureReason, INTERRUPTED_MESSAGE, InMemoryHistoryLog, Orchestrator, PipelineConfig,
    SlotOutcome,
};
use std::time::Duration;
use test_utils::{
    FailingHistoryLog, MockResponse, MockService, RejectingGate, face_image, product_image,
    ready_orchestrator,
};

fn storyboard_orchestrator(service: MockService) -> Orchestrator<MockService> {
    let orchestrator = Orchestrator::new(service, PipelineConfig::default());
    orchestrator.set_reference_media(Some(product_image()), None);
    orchestrator.update_settings(|s| {
        *s = s
            .clone()
            .with_product_description("Small-batch cold brew coffee".to_string());
    });
    orchestrator
}

#[tokio::test]
async fn test_retry_regenerates_failed_slot() -> anyhow::Result<()> {
    let service = MockService::new().with_response(2, MockResponse::Error("HTTP 500".to_string()));
    let orchestrator = ready_orchestrator(service);
    orchestrator.start_batch(Stage::Image).await?;
    assert_eq!(
        *orchestrator.slot(Stage::Image, 2).unwrap().status(),
        SlotStatus::Failed
    );

    let outcome = orchestrator.retry_slot(Stage::Image, 2).await?;

    assert!(outcome.is_ready());
    let slot = orchestrator.slot(Stage::Image, 2).unwrap();
    assert_eq!(*slot.status(), SlotStatus::Ready);
    assert!(slot.error().is_none());
    assert_eq!(orchestrator.service().call_count(), 5);
    Ok(())
}

#[tokio::test]
async fn test_unmet_precondition_fails_slot_without_call() -> anyhow::Result<()> {
    let orchestrator = ready_orchestrator(MockService::new());

    let outcome = orchestrator.retry_slot(Stage::Video, 0).await?;

    assert_eq!(
        outcome,
        SlotOutcome::Failed {
            reason: FailureReason::Validation,
            message: "Generate the image for scene 1 first".to_string(),
        }
    );
    let slot = orchestrator.slot(Stage::Video, 0).unwrap();
    assert_eq!(*slot.status(), SlotStatus::Failed);
    assert_eq!(orchestrator.service().call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_pending_slot_rejects_second_writer() -> anyhow::Result<()> {
    let (service, gate) = MockService::new().with_gate(0);
    let orchestrator = ready_orchestrator(service);

    let control = async {
        gate.entered().await;

        let retry = orchestrator.retry_slot(Stage::Image, 0).await.unwrap_err();
        assert!(matches!(
            retry.kind(),
            ReelsmithErrorKind::Command(e) if matches!(e.kind, CommandErrorKind::SlotPending { index: 0, .. })
        ));

        // Replacing the storyboard would reset a slot with a call in flight
        assert!(orchestrator.load_storyboard("**Scene 1:**\nA mug.").is_err());
        gate.release();
    };
    let (outcome, ()) = tokio::join!(orchestrator.retry_slot(Stage::Image, 0), control);

    assert!(outcome?.is_ready());
    assert_eq!(orchestrator.service().call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dropped_retry_releases_slot() -> anyhow::Result<()> {
    let (service, gate) = MockService::new().with_gate(0);
    let orchestrator = ready_orchestrator(service);

    tokio::select! {
        _ = orchestrator.retry_slot(Stage::Image, 1) => panic!("gated call finished"),
        () = gate.entered() => {}
    }

    let slot = orchestrator.slot(Stage::Image, 1).unwrap();
    assert_eq!(*slot.status(), SlotStatus::Failed);
    assert_eq!(slot.error().as_deref(), Some(INTERRUPTED_MESSAGE));

    let outcome = orchestrator.retry_slot(Stage::Image, 1).await?;
    assert!(outcome.is_ready());
    orchestrator.load_storyboard(test_utils::STORYBOARD)?;
    orchestrator.reset_all()?;
    Ok(())
}

#[tokio::test]
async fn test_timed_out_batch_releases_slot_and_batch() -> anyhow::Result<()> {
    let (service, _gate) = MockService::new().with_gate(2);
    let orchestrator = ready_orchestrator(service);

    let run = tokio::time::timeout(
        Duration::from_millis(50),
        orchestrator.start_batch(Stage::Image),
    )
    .await;
    assert!(run.is_err());

    let view = orchestrator.view();
    assert!(!view.batch.active);
    assert_eq!(*view.images[1].status(), SlotStatus::Ready);
    assert_eq!(*view.images[2].status(), SlotStatus::Failed);
    assert_eq!(*view.images[3].status(), SlotStatus::Empty);

    let report = orchestrator.run_batch(Stage::Image, &[2, 3]).await?;
    assert_eq!(report.ready(), &vec![2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_unknown_slot_is_an_error() {
    let orchestrator = ready_orchestrator(MockService::new());
    let err = orchestrator.retry_slot(Stage::Image, 9).await.unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Slot(_)));
}

#[tokio::test]
async fn test_retry_respects_usage_gate() {
    let orchestrator =
        ready_orchestrator(MockService::new()).with_usage_gate(Box::new(RejectingGate));
    let err = orchestrator.retry_slot(Stage::Image, 0).await.unwrap_err();
    assert_eq!(err.user_message(), "Daily generation limit reached");
    assert_eq!(
        *orchestrator.slot(Stage::Image, 0).unwrap().status(),
        SlotStatus::Empty
    );
}

#[tokio::test]
async fn test_edit_replaces_image_in_place() -> anyhow::Result<()> {
    let history = InMemoryHistoryLog::new();
    let orchestrator =
        ready_orchestrator(MockService::new()).with_history_log(Box::new(history.clone()));
    orchestrator.start_batch(Stage::Image).await?;
    let original = orchestrator.slot(Stage::Image, 0).unwrap().payload().clone();

    let outcome = orchestrator.edit_slot(0, "  make it brighter ").await?;

    let SlotOutcome::Ready(edited) = outcome else {
        panic!("edit failed: {outcome:?}");
    };
    assert_ne!(Some(edited.clone()), original);
    assert_eq!(
        orchestrator.slot(Stage::Image, 0).unwrap().payload().as_ref(),
        Some(&edited)
    );

    let request = orchestrator.service().requests().pop().unwrap();
    assert_eq!(*request.mode(), GenerationMode::ImageEdit);
    assert_eq!(request.reference_media().first(), original.as_ref());
    assert!(request.prompt().ends_with("make it brighter"));

    let last = history.entries().pop().unwrap();
    assert_eq!(*last.kind(), HistoryKind::Image);
    assert_eq!(last.prompt_summary(), "Edited Storyboard Scene 1: make it brighter");
    Ok(())
}

#[tokio::test]
async fn test_failed_edit_marks_slot_failed() -> anyhow::Result<()> {
    let service = MockService::new().with_response(4, MockResponse::Error("safety filter".to_string()));
    let orchestrator = ready_orchestrator(service);
    orchestrator.start_batch(Stage::Image).await?;

    let outcome = orchestrator.edit_slot(1, "add a lemon slice").await?;

    assert!(!outcome.is_ready());
    let slot = orchestrator.slot(Stage::Image, 1).unwrap();
    assert_eq!(*slot.status(), SlotStatus::Failed);
    assert!(slot.payload().is_none());
    assert!(slot.error().as_deref().unwrap().contains("safety filter"));
    Ok(())
}

#[tokio::test]
async fn test_edit_requires_instruction_and_image() -> anyhow::Result<()> {
    let orchestrator = ready_orchestrator(MockService::new());

    let err = orchestrator.edit_slot(0, "   ").await.unwrap_err();
    assert!(matches!(
        err.kind(),
        ReelsmithErrorKind::Command(e) if e.kind == CommandErrorKind::EmptyInstruction
    ));

    let outcome = orchestrator.edit_slot(0, "warmer").await?;
    assert!(matches!(
        outcome,
        SlotOutcome::Failed { reason: FailureReason::Validation, .. }
    ));
    assert_eq!(orchestrator.service().call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_history_records_successes_only() -> anyhow::Result<()> {
    let history = InMemoryHistoryLog::new();
    let service = MockService::new().with_response(3, MockResponse::Error("HTTP 429".to_string()));
    let orchestrator = ready_orchestrator(service).with_history_log(Box::new(history.clone()));

    orchestrator.start_batch(Stage::Image).await?;

    let summaries: Vec<String> = history
        .entries()
        .iter()
        .map(|e| e.prompt_summary().clone())
        .collect();
    assert_eq!(summaries.len(), 3);
    assert!(summaries[0].starts_with("Storyboard Scene 1: "));
    assert!(summaries[2].starts_with("Storyboard Scene 3: "));
    Ok(())
}

#[tokio::test]
async fn test_history_failure_does_not_fail_generation() -> anyhow::Result<()> {
    let orchestrator =
        ready_orchestrator(MockService::new()).with_history_log(Box::new(FailingHistoryLog));

    let report = orchestrator.start_batch(Stage::Image).await?;

    assert_eq!(report.ready().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_history_can_be_disabled() -> anyhow::Result<()> {
    let history = InMemoryHistoryLog::new();
    let config = PipelineConfig::default().with_record_history(false);
    let orchestrator = Orchestrator::new(MockService::new(), config)
        .with_history_log(Box::new(history.clone()));
    orchestrator.set_reference_media(Some(product_image()), None);
    orchestrator.load_storyboard(test_utils::STORYBOARD)?;

    orchestrator.start_batch(Stage::Image).await?;

    assert!(history.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_generate_storyboard() -> anyhow::Result<()> {
    let history = InMemoryHistoryLog::new();
    let orchestrator =
        storyboard_orchestrator(MockService::new()).with_history_log(Box::new(history.clone()));

    let storyboard = orchestrator.generate_storyboard().await?;

    assert_eq!(storyboard.len(), 4);
    assert_eq!(orchestrator.storyboard(), Some(storyboard));

    let request = orchestrator.service().requests().pop().unwrap();
    assert_eq!(*request.mode(), GenerationMode::Text);
    assert_eq!(request.reference_media().len(), 1);
    assert!(request.prompt().contains("Small-batch cold brew coffee"));
    assert!(request.prompt().contains("4-scene storyboard"));

    let entry = history.entries().pop().unwrap();
    assert_eq!(*entry.kind(), HistoryKind::Storyboard);
    assert!(entry.prompt_summary().starts_with("Product Review: "));
    assert!(matches!(entry.result(), HistoryResult::Text(_)));
    Ok(())
}

#[tokio::test]
async fn test_generate_storyboard_resets_slots() -> anyhow::Result<()> {
    let orchestrator = storyboard_orchestrator(MockService::new());
    orchestrator.load_storyboard(test_utils::STORYBOARD)?;
    orchestrator.start_batch(Stage::Image).await?;

    orchestrator.generate_storyboard().await?;

    assert!(
        orchestrator
            .view()
            .images
            .iter()
            .all(|s| *s.status() == SlotStatus::Empty)
    );
    Ok(())
}

#[tokio::test]
async fn test_generate_storyboard_validates_inputs() {
    let orchestrator = storyboard_orchestrator(MockService::new());
    orchestrator.update_settings(|s| *s = s.clone().with_include_model(true));

    let err = orchestrator.generate_storyboard().await.unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Validation(_)));

    orchestrator.update_settings(|s| *s = s.clone().with_product_description(String::new()));
    orchestrator.set_reference_media(Some(product_image()), Some(face_image()));
    let err = orchestrator.generate_storyboard().await.unwrap_err();
    assert_eq!(err.user_message(), "Provide a product description");

    assert_eq!(orchestrator.service().call_count(), 0);
}

#[tokio::test]
async fn test_generate_storyboard_with_model_sends_face() -> anyhow::Result<()> {
    let orchestrator = storyboard_orchestrator(MockService::new());
    orchestrator.set_reference_media(Some(product_image()), Some(face_image()));
    orchestrator.update_settings(|s| *s = s.clone().with_include_model(true));

    orchestrator.generate_storyboard().await?;

    let request = orchestrator.service().requests().pop().unwrap();
    assert_eq!(request.reference_media(), &vec![product_image(), face_image()]);
    Ok(())
}

#[tokio::test]
async fn test_unstructured_storyboard_is_kept_but_reported() {
    let service = MockService::new().with_response(
        0,
        MockResponse::Text("A lovely coffee, enjoyed slowly.".to_string()),
    );
    let orchestrator = storyboard_orchestrator(service);

    let err = orchestrator.generate_storyboard().await.unwrap_err();

    assert!(matches!(
        err.kind(),
        ReelsmithErrorKind::Parse(e) if e.kind == ParseErrorKind::NoSceneMarkers
    ));
    let storyboard = orchestrator.storyboard().unwrap();
    assert_eq!(storyboard.text(), "A lovely coffee, enjoyed slowly.");
    assert!(storyboard.is_empty());

    let err = orchestrator.start_batch(Stage::Image).await.unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Validation(_)));
}

#[tokio::test]
async fn test_empty_storyboard_response_is_service_error() {
    let service = MockService::new().with_response(0, MockResponse::Empty);
    let orchestrator = storyboard_orchestrator(service);

    let err = orchestrator.generate_storyboard().await.unwrap_err();

    assert!(matches!(err.kind(), ReelsmithErrorKind::Service(_)));
    assert!(orchestrator.storyboard().is_none());
}

#[tokio::test]
async fn test_scene_edit_feeds_next_generation() -> anyhow::Result<()> {
    let orchestrator = ready_orchestrator(MockService::new());
    orchestrator.start_batch(Stage::Image).await?;

    orchestrator.edit_scene_text(1, "A cat naps beside the jar.")?;

    // Results are kept until the slot is regenerated
    assert_eq!(
        *orchestrator.slot(Stage::Image, 1).unwrap().status(),
        SlotStatus::Ready
    );
    orchestrator.retry_slot(Stage::Image, 1).await?;
    let request = orchestrator.service().requests().pop().unwrap();
    assert!(request.prompt().contains("A cat naps beside the jar."));
    assert!(!request.prompt().contains("Ice cubes"));

    let storyboard = orchestrator.storyboard().unwrap();
    assert!(storyboard.scene(0).unwrap().raw_text().contains("sunlit kitchen"));
    Ok(())
}

#[tokio::test]
async fn test_scene_edit_out_of_range() {
    let orchestrator = Orchestrator::new(MockService::new(), PipelineConfig::default());
    let err = orchestrator.edit_scene_text(0, "x").unwrap_err();
    assert!(matches!(
        err.kind(),
        ReelsmithErrorKind::Parse(e) if e.kind == ParseErrorKind::SceneOutOfRange { index: 0, count: 0 }
    ));

    let orchestrator = ready_orchestrator(MockService::new());
    assert!(orchestrator.edit_scene_text(4, "x").is_err());
}

#[tokio::test]
async fn test_localized_storyboard() -> anyhow::Result<()> {
    let orchestrator = ready_orchestrator(MockService::new());
    orchestrator.update_settings(|s| {
        *s = s.clone().with_storyboard_language(Language::BahasaMalaysia);
    });

    let storyboard =
        orchestrator.load_storyboard("**Babak 1:**\nSkrip Suara Latar: Cuba sekarang\nSebuah balang.")?;

    let fields = storyboard.scene(0).unwrap().fields();
    assert_eq!(fields.spoken_script(), "Cuba sekarang");
    assert_eq!(fields.visual_description(), "Sebuah balang.");
    Ok(())
}

#[tokio::test]
async fn test_reset_all() -> anyhow::Result<()> {
    let orchestrator = ready_orchestrator(MockService::new());
    orchestrator.start_batch(Stage::Image).await?;

    orchestrator.reset_all()?;

    let view = orchestrator.view();
    assert!(view.storyboard.is_none());
    assert!(view.images.iter().all(|s| *s.status() == SlotStatus::Empty));
    assert_eq!(view.settings, Default::default());
    let err = orchestrator.start_batch(Stage::Image).await.unwrap_err();
    assert!(matches!(err.kind(), ReelsmithErrorKind::Validation(_)));
    Ok(())
}
