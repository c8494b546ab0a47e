//! HTTP DTOs for the agent endpoint.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::sales::{AgentReply, ConversationTurn, InterestLevel, SalesStage, StageCursor};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One customer turn.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReplyRequest {
    pub user_text: String,
    /// Response id returned by the previous turn.
    pub previous_response_id: Option<String>,
    pub chat_model: String,
    /// Stage returned by the previous turn.
    pub previous_stage: Option<SalesStage>,
    /// Interrupted stage returned by the previous turn.
    pub interrupted_stage: Option<SalesStage>,
    /// Whether the previous turn offered the purchase link.
    #[serde(default)]
    pub link_offered: bool,
}

impl AgentReplyRequest {
    /// Converts to a domain turn, validating the echoed stage cursor.
    pub fn into_turn(self) -> Result<ConversationTurn, ValidationError> {
        let prior = match (self.previous_stage, self.interrupted_stage, self.link_offered) {
            (Some(stage), interrupted, offered) => {
                Some(StageCursor::new(stage, interrupted)?.with_link_offered(offered)?)
            }
            (None, Some(_), _) => {
                return Err(ValidationError::invalid_format(
                    "interruptedStage",
                    "requires previousStage",
                ))
            }
            (None, None, true) => {
                return Err(ValidationError::invalid_format(
                    "linkOffered",
                    "requires previousStage",
                ))
            }
            (None, None, false) => None,
        };

        Ok(ConversationTurn {
            user_text: self.user_text,
            continuation_token: self
                .previous_response_id
                .filter(|id| !id.trim().is_empty()),
            model: self.chat_model,
            prior,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// The agent's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReplyResponse {
    pub text: String,
    pub response_id: String,
    pub stage: SalesStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest: Option<InterestLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupted_stage: Option<SalesStage>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub link_offered: bool,
}

impl From<AgentReply> for AgentReplyResponse {
    fn from(reply: AgentReply) -> Self {
        Self {
            stage: reply.cursor.stage(),
            interrupted_stage: reply.cursor.interrupted(),
            link_offered: reply.cursor.link_offered(),
            interest: reply.interest,
            response_id: reply.continuation_token,
            text: reply.message_text,
        }
    }
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ════════════════════════════════════════════════════════════════════════════
// Error Response
// ════════════════════════════════════════════════════════════════════════════

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
