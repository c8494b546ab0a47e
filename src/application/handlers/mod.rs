//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod sales;

pub use sales::{GenerationSettings, InvalidInputReason, ProduceReplyHandler, TurnError};
