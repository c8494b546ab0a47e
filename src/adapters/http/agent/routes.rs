//! Axum routes for the agent endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, produce_reply, AgentAppState};

/// Creates routes for agent endpoints.
///
/// - POST /api/agent/reply - Produce the next agent reply
pub fn agent_routes() -> Router<AgentAppState> {
    Router::new().route("/agent/reply", post(produce_reply))
}

/// Combined router: agent routes under /api plus GET /health.
pub fn agent_router() -> Router<AgentAppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", agent_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_routes_creates_valid_router() {
        let _routes = agent_routes();
    }

    #[test]
    fn agent_router_creates_combined_router() {
        let _router = agent_router();
    }
}
