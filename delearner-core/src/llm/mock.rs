//! Scripted generation backend for testing
//!
//! Responses are handed out in the order they were queued, one per call. Each one may
//! carry a delay so tests can interleave concurrent requests deterministically under a
//! paused tokio clock.

#![cfg(test)]

use super::errors::LLMError;
use super::traits::GenerationBackend;
use super::types::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Scripted {
    outcome: Result<String, LLMError>,
    delay: Duration,
}

/// Mock backend for testing
#[derive(Clone, Default)]
pub struct MockBackend {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    call_history: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text response
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()), Duration::ZERO)
    }

    /// Queue a text response that arrives after `delay`
    pub fn with_delayed_response(self, text: impl Into<String>, delay: Duration) -> Self {
        self.push(Ok(text.into()), delay)
    }

    /// Queue a JSON response
    pub fn with_json(self, value: serde_json::Value) -> Self {
        self.with_response(value.to_string())
    }

    /// Queue an error
    pub fn with_error(self, error: LLMError) -> Self {
        self.push(Err(error), Duration::ZERO)
    }

    fn push(self, outcome: Result<String, LLMError>, delay: Duration) -> Self {
        self.script.lock().unwrap().push_back(Scripted { outcome, delay });
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }

    /// Requests received so far, oldest first
    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.call_history.lock().unwrap().clone()
    }

    /// Prompt text of the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.call_history.lock().unwrap().last().map(|r| r.prompt_text.clone())
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LLMError> {
        let model = request.model.clone();
        self.call_history.lock().unwrap().push(request);

        let next = self.script.lock().unwrap().pop_front();
        let Some(Scripted { outcome, delay }) = next else {
            return Err(LLMError::empty_response("mock"));
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        outcome.map(|text| GenerationResponse::text(model, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_in_order() {
        let backend = MockBackend::new().with_response("first").with_error(LLMError::auth("no"));
        let request = GenerationRequest::json("m", "p", serde_json::json!({}));

        let first = backend.generate(request.clone()).await.unwrap();
        assert_eq!(first.text, "first");

        let second = backend.generate(request.clone()).await;
        assert!(matches!(second, Err(LLMError::AuthenticationError { .. })));

        let third = backend.generate(request).await;
        assert!(matches!(third, Err(LLMError::EmptyResponse { .. })));
        assert_eq!(backend.call_count(), 3);
        assert_eq!(backend.last_prompt().as_deref(), Some("p"));
    }
}
