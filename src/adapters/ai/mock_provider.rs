//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling the real OpenAI API.
//!
//! # Features
//!
//! - Queued responses, each with its own response id
//! - Empty-output responses for the no-content path
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response("Hi! What do you usually use a pen for?\nStage: Discovery; Interest: warm");
//!
//! let response = provider.complete(request).await?;
//! assert_eq!(response.id, "resp_mock_1");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, OutputContent, OutputItem,
    TokenUsage,
};

/// Model name the mock accepts unless told otherwise.
pub const MOCK_MODEL: &str = "mock-model-1";

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    models: Vec<String>,
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
    issued: Arc<AtomicUsize>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// A message with one output_text part.
    Text { text: String, usage: TokenUsage },
    /// A response with no message output at all.
    EmptyOutput,
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    /// Simulate a rejected request, e.g. an unknown continuation token.
    InvalidRequest { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::InvalidRequest { message } => AIError::invalid_request(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            models: vec![MOCK_MODEL.to_string()],
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            issued: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queues a successful response whose only output is `text`.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.with_response_usage(text, TokenUsage::new(10, 20))
    }

    pub fn with_response_usage(self, text: impl Into<String>, usage: TokenUsage) -> Self {
        self.push(MockResponse::Text {
            text: text.into(),
            usage,
        })
    }

    /// Queues a response with an empty output list.
    pub fn with_empty_output(self) -> Self {
        self.push(MockResponse::EmptyOutput)
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockResponse::Error(error))
    }

    /// Adds a model name the mock accepts.
    pub fn with_supported_model(mut self, model: impl Into<String>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        locked(&self.calls).clone()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<CompletionRequest> {
        locked(&self.calls).last().cloned()
    }

    pub fn clear_calls(&self) {
        locked(&self.calls).clear();
    }

    fn push(self, response: MockResponse) -> Self {
        locked(&self.responses).push_back(response);
        self
    }

    fn next_response(&self) -> MockResponse {
        locked(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Text {
                text: "Mock response".to_string(),
                usage: TokenUsage::new(5, 10),
            })
    }

    fn next_id(&self) -> String {
        format!("resp_mock_{}", self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let model = request.model.clone();
        locked(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let (output, usage) = match self.next_response() {
            MockResponse::Text { text, usage } => (
                vec![OutputItem::Message {
                    content: vec![OutputContent::OutputText { text }],
                }],
                usage,
            ),
            MockResponse::EmptyOutput => (Vec::new(), TokenUsage::zero()),
            MockResponse::Error(err) => return Err(err.into()),
        };

        Ok(CompletionResponse {
            id: self.next_id(),
            model,
            output,
            usage,
        })
    }

    fn supports_model(&self, model: &str) -> bool {
        self.models.iter().any(|m| m == model)
    }
}
