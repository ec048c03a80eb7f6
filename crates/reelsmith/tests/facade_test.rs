//! The facade exposes the whole pipeline from one crate.

use async_trait::async_trait;
use reelsmith::{
    FileSnapshotStore, GenerationRequest, GenerationResponse, GenerationService, Language,
    Orchestrator, PipelineConfig, ReelsmithResult, ServiceError, ServiceErrorKind, SnapshotStore,
    Storyboard, default_label, has_scene_markers,
};
use std::sync::Arc;
use tempfile::TempDir;

/// Service that refuses every call.
struct OfflineService;

#[async_trait]
impl GenerationService for OfflineService {
    async fn generate(&self, _req: &GenerationRequest) -> ReelsmithResult<GenerationResponse> {
        Err(ServiceError::new(ServiceErrorKind::Request("offline".to_string())).into())
    }

    fn provider_name(&self) -> &'static str {
        "offline"
    }

    fn model_name(&self) -> &str {
        "none"
    }
}

#[test]
fn test_storyboard_through_facade() {
    let text = format!("{}\nA jar on a table.", default_label(0, Language::BahasaMalaysia));
    assert!(has_scene_markers(&text));

    let storyboard = Storyboard::parse(text, Language::BahasaMalaysia, 4);
    assert_eq!(storyboard.scene(0).unwrap().label(), "**Babak 1:**");
}

#[test]
fn test_orchestrator_with_file_snapshots() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(dir.path(), 64 * 1024)?);

    let orchestrator = Orchestrator::new(OfflineService, PipelineConfig::default())
        .with_snapshot_store(store.clone());
    orchestrator.update_settings(|s| *s = s.clone().with_camera("Drone shot".to_string()));

    let restored =
        Orchestrator::new(OfflineService, PipelineConfig::default()).with_snapshot_store(store);
    assert_eq!(restored.settings().camera(), "Drone shot");
    assert_eq!(restored.service().provider_name(), "offline");
    Ok(())
}
