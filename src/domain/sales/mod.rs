//! Sales domain - the scripted pen-selling conversation.
//!
//! Stages, utterance classification, the declarative script, the stage
//! transition engine, structured-output parsing, and conformance checks.

mod reply;
mod script;
mod signals;
mod stage;
mod transition;
mod turn;
mod validator;

pub use reply::{format_metadata, MetadataLine, ParsedReply, ReplyParseError, ReplyParts};
pub use script::{EntryCondition, ObjectionStep, PhraseFamily, SalesScript, StageCue, StageRule};
pub use signals::UtteranceSignals;
pub use stage::{InterestLevel, SalesStage};
pub use transition::{StageTransitionEngine, TurnPlan};
pub use turn::{AgentReply, ConversationTurn, StageCursor};
pub use validator::{validate, ScriptViolation};
