//! HTTP handlers for the agent endpoint.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::{ProduceReplyHandler, TurnError};
use crate::domain::foundation::ErrorCode;

use super::dto::{AgentReplyRequest, AgentReplyResponse, ErrorResponse, HealthResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for agent handlers.
#[derive(Clone)]
pub struct AgentAppState {
    pub handler: Arc<ProduceReplyHandler>,
}

impl AgentAppState {
    pub fn new(handler: Arc<ProduceReplyHandler>) -> Self {
        Self { handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/agent/reply
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/agent/reply - Produce the agent's reply to one customer message.
///
/// # Errors
/// - 400 Bad Request: empty text, unsupported model, or inconsistent stage cursor
/// - 502 Bad Gateway: provider failed or produced no content
pub async fn produce_reply(
    State(state): State<AgentAppState>,
    Json(request): Json<AgentReplyRequest>,
) -> Result<impl IntoResponse, AgentApiError> {
    let turn = request
        .into_turn()
        .map_err(|e| AgentApiError::BadRequest(ErrorCode::InvalidStageCursor, e.to_string()))?;

    let reply = state.handler.handle(turn).await?;

    Ok((StatusCode::OK, Json(AgentReplyResponse::from(reply))))
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type for agent endpoints.
#[derive(Debug)]
pub enum AgentApiError {
    BadRequest(ErrorCode, String),
    BadGateway(ErrorCode, String),
}

impl From<TurnError> for AgentApiError {
    fn from(err: TurnError) -> Self {
        if err.is_invalid_input() {
            AgentApiError::BadRequest(err.code(), err.to_string())
        } else {
            AgentApiError::BadGateway(err.code(), err.to_string())
        }
    }
}

impl IntoResponse for AgentApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            AgentApiError::BadRequest(code, msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, msg))
            }
            AgentApiError::BadGateway(code, msg) => {
                tracing::error!(%code, "Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(code, msg))
            }
        };

        (status, Json(error)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError, MOCK_MODEL};
    use crate::adapters::product::LuxuryPenFacts;
    use crate::application::InvalidInputReason;
    use crate::domain::sales::SalesStage;

    fn state(provider: MockAIProvider) -> AgentAppState {
        AgentAppState::new(Arc::new(ProduceReplyHandler::new(
            Arc::new(provider),
            Arc::new(LuxuryPenFacts),
        )))
    }

    fn request(user_text: &str) -> AgentReplyRequest {
        AgentReplyRequest {
            user_text: user_text.to_string(),
            previous_response_id: None,
            chat_model: MOCK_MODEL.to_string(),
            previous_stage: None,
            interrupted_stage: None,
            link_offered: false,
        }
    }

    #[tokio::test]
    async fn produce_reply_returns_ok() {
        let provider = MockAIProvider::new()
            .with_response("Hi! What do you usually use a pen for?\nStage: Discovery; Interest: warm");

        let response = produce_reply(State(state(provider)), Json(request("Hi")))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_text_is_bad_request() {
        let err = produce_reply(State(state(MockAIProvider::new())), Json(request(" ")))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AgentApiError::BadRequest(ErrorCode::EmptyUserText, _)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn inconsistent_cursor_is_bad_request() {
        let mut req = request("Hi");
        req.previous_stage = Some(SalesStage::Action);
        req.interrupted_stage = Some(SalesStage::Discovery);

        let err = produce_reply(State(state(MockAIProvider::new())), Json(req))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, AgentApiError::BadRequest(ErrorCode::InvalidStageCursor, _)));
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);

        let err = produce_reply(State(state(provider)), Json(request("Hi")))
            .await
            .err()
            .unwrap();

        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn turn_errors_map_to_status_classes() {
        let bad_model: AgentApiError =
            TurnError::InvalidInput(InvalidInputReason::InvalidModelIdentifier("x".into())).into();
        assert!(matches!(bad_model, AgentApiError::BadRequest(ErrorCode::InvalidModelIdentifier, _)));

        let no_content: AgentApiError = TurnError::NoContentProduced.into();
        assert!(matches!(no_content, AgentApiError::BadGateway(ErrorCode::NoContentProduced, _)));
    }
}
