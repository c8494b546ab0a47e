//! HTTP adapters - REST API implementations.

pub mod agent;

pub use agent::{agent_router, AgentAppState};
