//! Sales turn handlers.

mod produce_reply;

pub use produce_reply::{GenerationSettings, InvalidInputReason, ProduceReplyHandler, TurnError};
