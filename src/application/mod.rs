//! Application layer - Turn orchestration.
//!
//! This layer coordinates the sales domain with the AI provider and product
//! knowledge ports.

pub mod handlers;

pub use handlers::{GenerationSettings, InvalidInputReason, ProduceReplyHandler, TurnError};
