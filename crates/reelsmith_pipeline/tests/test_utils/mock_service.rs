//! Mock generation service for testing.

use async_trait::async_trait;
use reelsmith_core::{
    GenerationMode, GenerationRequest, GenerationResponse, MediaPayload,
};
use reelsmith_error::{ReelsmithResult, ServiceError, ServiceErrorKind};
use reelsmith_interface::GenerationService;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::STORYBOARD;

/// A single scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Media with the given MIME type
    Media(&'static str),
    /// Text output
    Text(String),
    /// `ServiceErrorKind::Request` with the given message
    Error(String),
    /// A response with no outputs
    Empty,
}

impl MockResponse {
    /// Default response for a call shape.
    fn for_mode(mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Text => MockResponse::Text(STORYBOARD.to_string()),
            GenerationMode::ImageComposition | GenerationMode::ImageEdit => {
                MockResponse::Media("image/png")
            }
            GenerationMode::Video => MockResponse::Media("video/mp4"),
        }
    }
}

/// Pauses one call until the test releases it.
#[derive(Debug, Clone, Default)]
pub struct CallGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl CallGate {
    /// Wait until the gated call has started.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the gated call finish.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Mock generation service for testing.
///
/// Answers every call with a sensible default for its mode unless a response was
/// scripted for that call number (0-based). Media payloads carry the call number so
/// tests can tell results apart.
#[derive(Debug, Default)]
pub struct MockService {
    script: HashMap<usize, MockResponse>,
    gate: Option<(usize, CallGate)>,
    unsupported: Vec<GenerationMode>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl MockService {
    /// Service that succeeds on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response to call `call`.
    #[allow(dead_code)]
    pub fn with_response(mut self, call: usize, response: MockResponse) -> Self {
        self.script.insert(call, response);
        self
    }

    /// Pause call `call` until the returned gate is released.
    #[allow(dead_code)]
    pub fn with_gate(mut self, call: usize) -> (Self, CallGate) {
        let gate = CallGate::default();
        self.gate = Some((call, gate.clone()));
        (self, gate)
    }

    /// Report `mode` as unsupported.
    #[allow(dead_code)]
    pub fn without_mode(mut self, mode: GenerationMode) -> Self {
        self.unsupported.push(mode);
        self
    }

    /// Get the number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every request received, in order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for MockService {
    async fn generate(&self, req: &GenerationRequest) -> ReelsmithResult<GenerationResponse> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(req.clone());
            calls.len() - 1
        };

        if let Some((gated, gate)) = &self.gate {
            if *gated == call {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
        }

        let response = self
            .script
            .get(&call)
            .cloned()
            .unwrap_or_else(|| MockResponse::for_mode(*req.mode()));

        match response {
            MockResponse::Media(mime) => Ok(GenerationResponse::media(MediaPayload::new(
                mime,
                vec![call as u8 + 1],
            ))),
            MockResponse::Text(text) => Ok(GenerationResponse::text(text)),
            MockResponse::Error(message) => {
                Err(ServiceError::new(ServiceErrorKind::Request(message)).into())
            }
            MockResponse::Empty => Ok(GenerationResponse::default()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }

    fn supports(&self, mode: GenerationMode) -> bool {
        !self.unsupported.contains(&mode)
    }
}
