//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (errors, state machine trait)
//! - `sales` - The scripted sales conversation: stages, script, transitions

pub mod foundation;
pub mod sales;
