//! Trait definitions for external collaborators.

use async_trait::async_trait;
use reelsmith_core::{GenerationMode, GenerationRequest, GenerationResponse, HistoryEntry, Stage};
use reelsmith_error::ReelsmithResult;

/// Core trait that every generation backend implements.
///
/// Latency and retry policy belong to the implementation. The orchestrator issues at
/// most one call per slot at a time and imposes no timeout of its own.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Run one generation call.
    ///
    /// Errors should be `ServiceError`s; an empty response is also treated as a
    /// service failure by the caller.
    async fn generate(&self, req: &GenerationRequest) -> ReelsmithResult<GenerationResponse>;

    /// Provider name (e.g., "gemini", "veo").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "veo-3.0-generate-001").
    fn model_name(&self) -> &str;

    /// Whether this backend accepts the given call shape.
    fn supports(&self, _mode: GenerationMode) -> bool {
        true
    }
}

/// Append-only audit trail of successful generations.
///
/// Callers swallow failures: a history error never fails a generation.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Record one entry.
    async fn append(&self, entry: HistoryEntry) -> ReelsmithResult<()>;
}

/// External gate (usage quota, credentials) consulted before work starts.
pub trait UsageGate: Send + Sync {
    /// `Ok` when work for `stage` may start; a `ValidationError` otherwise.
    ///
    /// `None` means the text-only storyboard call.
    fn check(&self, stage: Option<Stage>) -> ReelsmithResult<()>;
}

/// Gate that lets everything through.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl UsageGate for OpenGate {
    fn check(&self, _stage: Option<Stage>) -> ReelsmithResult<()> {
        Ok(())
    }
}
