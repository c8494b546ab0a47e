//! AI Provider Port - Interface for the hosted language model.
//!
//! The agent sends one request per customer turn: an ordered list of
//! role-tagged segments plus an optional continuation token naming the
//! provider-side response it follows. The provider keeps the conversation
//! history; this side never replays it.
//!
//! # Example
//!
//! ```ignore
//! let request = CompletionRequest::new("gpt-4o-mini", RequestMetadata::new("turn-1"))
//!     .with_message(Message::system(instructions))
//!     .with_message(Message::user("How much is the pen?"))
//!     .with_previous_response_id("resp_abc");
//!
//! let response = provider.complete(request).await?;
//! let text = response.first_output_text();
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for language model interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Produces one response for the request. Non-streaming.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Returns true if this provider can serve `model`.
    ///
    /// Checked before any network call so a bad model name never costs a
    /// round trip.
    fn supports_model(&self, model: &str) -> bool;
}

/// Request for one completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Role-tagged input segments, in order.
    pub segments: Vec<Message>,
    /// Provider response this request continues.
    pub previous_response_id: Option<String>,
    /// Model identifier.
    pub model: String,
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, metadata: RequestMetadata) -> Self {
        Self {
            segments: Vec::new(),
            previous_response_id: None,
            model: model.into(),
            max_output_tokens: None,
            temperature: None,
            metadata,
        }
    }

    /// Appends an input segment.
    pub fn with_message(mut self, message: Message) -> Self {
        self.segments.push(message);
        self
    }

    pub fn with_previous_response_id(mut self, id: impl Into<String>) -> Self {
        self.previous_response_id = Some(id.into());
        self
    }

    /// Sets the continuation token when one is present.
    pub fn with_continuation(mut self, id: Option<String>) -> Self {
        self.previous_response_id = id;
        self
    }

    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Concatenated content of all segments with `role`.
    pub fn content_for(&self, role: MessageRole) -> String {
        self.segments
            .iter()
            .filter(|segment| segment.role == role)
            .map(|segment| segment.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One role-tagged input segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Role of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions that steer the model.
    System,
    /// Customer input.
    User,
}

/// Request metadata for tracing.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
        }
    }
}

/// One provider response.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    /// Provider-issued id. Used as the next turn's continuation token.
    pub id: String,
    /// Model that produced the response.
    pub model: String,
    pub output: Vec<OutputItem>,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// Text of the first `output_text` content item in the first message,
    /// if there is one.
    pub fn first_output_text(&self) -> Option<&str> {
        self.output.iter().find_map(|item| match item {
            OutputItem::Message { content } => content.iter().find_map(|part| match part {
                OutputContent::OutputText { text } => Some(text.as_str()),
                OutputContent::Refusal { .. } => None,
            }),
            OutputItem::Other { .. } => None,
        })
    }

    /// Refusal text, if the model declined instead of answering.
    pub fn refusal(&self) -> Option<&str> {
        self.output.iter().find_map(|item| match item {
            OutputItem::Message { content } => content.iter().find_map(|part| match part {
                OutputContent::Refusal { refusal } => Some(refusal.as_str()),
                OutputContent::OutputText { .. } => None,
            }),
            OutputItem::Other { .. } => None,
        })
    }
}

/// An item in the response output list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputItem {
    Message { content: Vec<OutputContent> },
    /// Reasoning, tool calls, and anything else not shown to the customer.
    Other { kind: String },
}

/// A content part of an output message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputContent {
    OutputText { text: String },
    Refusal { refusal: String },
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// AI provider errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request (bad model, bad continuation token).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
