//! Turn-level value objects: the stage cursor echoed between turns, the
//! inbound turn, and the agent's reply.

use serde::{Deserialize, Serialize};

use super::script::StageCue;
use super::stage::{InterestLevel, SalesStage};
use super::validator::ScriptViolation;
use crate::domain::foundation::ValidationError;

/// Where the conversation stands after a turn.
///
/// The caller keeps this and sends it back with the next turn. When the
/// stage is Objection, `interrupted` names the primary stage the objection
/// broke into (if any), so the conversation can resume there. In
/// Commitment, `link_offered` records that the last reply offered the link,
/// so only a yes to that offer closes the sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StageCursorParts")]
pub struct StageCursor {
    stage: SalesStage,
    interrupted: Option<SalesStage>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    link_offered: bool,
}

#[derive(Deserialize)]
struct StageCursorParts {
    stage: SalesStage,
    #[serde(default)]
    interrupted: Option<SalesStage>,
    #[serde(default)]
    link_offered: bool,
}

impl TryFrom<StageCursorParts> for StageCursor {
    type Error = ValidationError;

    fn try_from(parts: StageCursorParts) -> Result<Self, Self::Error> {
        Self::new(parts.stage, parts.interrupted)?.with_link_offered(parts.link_offered)
    }
}

impl StageCursor {
    /// Creates a validated cursor.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if `interrupted` is set on a primary stage or
    /// names Objection itself.
    pub fn new(stage: SalesStage, interrupted: Option<SalesStage>) -> Result<Self, ValidationError> {
        match interrupted {
            Some(SalesStage::Objection) => Err(ValidationError::invalid_format(
                "interrupted_stage",
                "an objection cannot interrupt another objection",
            )),
            Some(_) if !stage.is_objection() => Err(ValidationError::invalid_format(
                "interrupted_stage",
                format!("only an Objection cursor carries an interrupted stage, got {stage}"),
            )),
            _ => Ok(Self {
                stage,
                interrupted,
                link_offered: false,
            }),
        }
    }

    /// Marks whether the last Commitment reply offered the link.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` if set on any stage but Commitment.
    pub fn with_link_offered(mut self, offered: bool) -> Result<Self, ValidationError> {
        if offered && self.stage != SalesStage::Commitment {
            return Err(ValidationError::invalid_format(
                "link_offered",
                format!("only a Commitment cursor can record a link offer, got {}", self.stage),
            ));
        }
        self.link_offered = offered;
        Ok(self)
    }

    /// Cursor parked on a primary stage.
    pub fn at(stage: SalesStage) -> Self {
        Self {
            stage,
            interrupted: None,
            link_offered: false,
        }
    }

    /// Commitment cursor after the link was offered.
    pub fn offering_link() -> Self {
        Self {
            stage: SalesStage::Commitment,
            interrupted: None,
            link_offered: true,
        }
    }

    /// Objection cursor remembering the stage it interrupted.
    pub fn objection(interrupted: Option<SalesStage>) -> Self {
        Self {
            stage: SalesStage::Objection,
            interrupted: interrupted.filter(|stage| !stage.is_objection()),
            link_offered: false,
        }
    }

    pub fn stage(&self) -> SalesStage {
        self.stage
    }

    pub fn interrupted(&self) -> Option<SalesStage> {
        self.interrupted
    }

    pub fn link_offered(&self) -> bool {
        self.link_offered
    }

    /// The primary stage this cursor stands for.
    ///
    /// For an objection that interrupted nothing, the conversation resumes at
    /// Presentation: an unprompted concern is nearly always about the product.
    pub fn resume_stage(&self) -> SalesStage {
        if self.stage.is_objection() {
            self.interrupted.unwrap_or(SalesStage::Presentation)
        } else {
            self.stage
        }
    }
}

/// One inbound customer message with its conversation context.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub user_text: String,
    /// Opaque provider token linking this turn to the previous one.
    pub continuation_token: Option<String>,
    pub model: String,
    pub prior: Option<StageCursor>,
}

impl ConversationTurn {
    pub fn new(user_text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            continuation_token: None,
            model: model.into(),
            prior: None,
        }
    }

    pub fn with_continuation(mut self, token: impl Into<String>) -> Self {
        self.continuation_token = Some(token.into());
        self
    }

    pub fn with_prior(mut self, cursor: StageCursor) -> Self {
        self.prior = Some(cursor);
        self
    }
}

/// The agent's answer to one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    /// Customer-facing text, metadata removed.
    pub message_text: String,
    /// Token to pass as `continuation_token` on the next turn.
    pub continuation_token: String,
    pub cursor: StageCursor,
    pub cue: StageCue,
    /// Interest reported by the provider, when its metadata line parsed.
    pub interest: Option<InterestLevel>,
    /// Script rules the message broke. Advisory only.
    pub conformance: Vec<ScriptViolation>,
}

impl AgentReply {
    pub fn stage(&self) -> SalesStage {
        self.cursor.stage()
    }

    pub fn is_conforming(&self) -> bool {
        self.conformance.is_empty()
    }
}
