//! HTTP adapter for the sales agent endpoint.

mod dto;
mod handlers;
mod routes;

pub use dto::{AgentReplyRequest, AgentReplyResponse, ErrorResponse, HealthResponse};
pub use handlers::{health, produce_reply, AgentApiError, AgentAppState};
pub use routes::{agent_router, agent_routes};
