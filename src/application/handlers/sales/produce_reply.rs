//! ProduceReply command handler.
//!
//! Turns one customer message into one agent reply: plans the stage, sends
//! the script, product facts and utterance to the provider, and reads the
//! structured output back.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::ErrorCode;
use crate::domain::sales::{
    validate, AgentReply, ConversationTurn, InterestLevel, MetadataLine, ReplyParts,
    StageTransitionEngine, TurnPlan,
};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, Message, ProductKnowledge, RequestMetadata,
};

/// Why a turn was rejected before reaching the provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputReason {
    #[error("user text is empty")]
    EmptyUserText,

    #[error("model '{0}' is not supported")]
    InvalidModelIdentifier(String),
}

/// Errors that can occur when producing a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("Invalid input: {0}")]
    InvalidInput(InvalidInputReason),

    /// The provider call failed for any reason.
    #[error("AI provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered without usable text.
    #[error("AI provider produced no content")]
    NoContentProduced,
}

impl TurnError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TurnError::InvalidInput(InvalidInputReason::EmptyUserText) => ErrorCode::EmptyUserText,
            TurnError::InvalidInput(InvalidInputReason::InvalidModelIdentifier(_)) => {
                ErrorCode::InvalidModelIdentifier
            }
            TurnError::ProviderUnavailable(_) => ErrorCode::ProviderUnavailable,
            TurnError::NoContentProduced => ErrorCode::NoContentProduced,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TurnError::InvalidInput(_))
    }
}

impl From<InvalidInputReason> for TurnError {
    fn from(reason: InvalidInputReason) -> Self {
        TurnError::InvalidInput(reason)
    }
}

impl From<AIError> for TurnError {
    fn from(err: AIError) -> Self {
        TurnError::ProviderUnavailable(err.to_string())
    }
}

/// Sampling settings forwarded on every request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_output_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: Some(300),
            temperature: None,
        }
    }
}

/// Handler for producing the agent's reply to one customer turn.
///
/// Holds no per-conversation state; the caller echoes the stage cursor and
/// continuation token back on each turn.
pub struct ProduceReplyHandler {
    ai_provider: Arc<dyn AIProvider>,
    product_knowledge: Arc<dyn ProductKnowledge>,
    engine: StageTransitionEngine,
    settings: GenerationSettings,
}

impl ProduceReplyHandler {
    pub fn new(
        ai_provider: Arc<dyn AIProvider>,
        product_knowledge: Arc<dyn ProductKnowledge>,
    ) -> Self {
        Self {
            ai_provider,
            product_knowledge,
            engine: StageTransitionEngine::new(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    #[tracing::instrument(skip(self, turn), fields(model = %turn.model, prior_stage = ?turn.prior.map(|c| c.stage())))]
    pub async fn handle(&self, turn: ConversationTurn) -> Result<AgentReply, TurnError> {
        let user_text = turn.user_text.trim();
        if user_text.is_empty() {
            return Err(InvalidInputReason::EmptyUserText.into());
        }
        if !self.ai_provider.supports_model(&turn.model) {
            return Err(InvalidInputReason::InvalidModelIdentifier(turn.model).into());
        }

        let plan = self.engine.next_turn(turn.prior.as_ref(), user_text);
        tracing::debug!(stage = %plan.stage(), cue = ?plan.cue, "Planned turn");

        let request = self.build_request(&turn, user_text, &plan);
        let response = self.ai_provider.complete(request).await.map_err(|e| {
            tracing::debug!(error = %e, "AI provider call failed");
            TurnError::from(e)
        })?;

        let raw = response.first_output_text().ok_or_else(|| {
            if let Some(refusal) = response.refusal() {
                tracing::warn!(refusal, "Provider refused to answer");
            }
            TurnError::NoContentProduced
        })?;

        let parts = ReplyParts::split(raw);
        let message_text = parts.message.trim();
        if message_text.is_empty() {
            return Err(TurnError::NoContentProduced);
        }

        let interest = self.read_metadata(parts.metadata, &plan);

        let conformance = match validate(plan.stage(), message_text) {
            Ok(()) => Vec::new(),
            Err(violations) => {
                for violation in &violations {
                    tracing::debug!(%violation, "Reply deviates from script");
                }
                violations
            }
        };

        tracing::info!(
            response_id = %response.id,
            stage = %plan.stage(),
            total_tokens = response.usage.total_tokens,
            "Reply produced"
        );

        Ok(AgentReply {
            message_text: message_text.to_string(),
            continuation_token: response.id,
            cursor: plan.cursor,
            cue: plan.cue,
            interest,
            conformance,
        })
    }

    fn build_request(
        &self,
        turn: &ConversationTurn,
        user_text: &str,
        plan: &TurnPlan,
    ) -> CompletionRequest {
        let instructions = self.engine.script().render_instructions(plan);
        let facts = format!("Product reference:\n{}", self.product_knowledge.fact_sheet());

        let mut request = CompletionRequest::new(
            turn.model.clone(),
            RequestMetadata::new(format!("turn-{}", Uuid::new_v4())),
        )
        .with_message(Message::system(instructions))
        .with_message(Message::system(facts))
        .with_message(Message::user(user_text))
        .with_continuation(turn.continuation_token.clone());

        if let Some(max) = self.settings.max_output_tokens {
            request = request.with_max_output_tokens(max);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }

    /// Reads the provider's self-reported stage and interest. Failures are
    /// logged and otherwise ignored; the planned stage stands.
    fn read_metadata(&self, metadata: Option<&str>, plan: &TurnPlan) -> Option<InterestLevel> {
        let Some(line) = metadata else {
            tracing::warn!("Provider reply has no metadata line");
            return None;
        };

        match MetadataLine::parse(line) {
            Ok(parsed) => {
                if parsed.stage != plan.stage() {
                    tracing::warn!(
                        planned = %plan.stage(),
                        reported = %parsed.stage,
                        "Provider reported a different stage"
                    );
                }
                Some(parsed.interest)
            }
            Err(e) => {
                tracing::warn!(code = %e.code(), error = %e, "Could not parse reply metadata");
                None
            }
        }
    }
}
