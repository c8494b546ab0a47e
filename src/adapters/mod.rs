//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - OpenAI Responses API client and a scriptable mock
//! - `product` - The luxury pen fact sheet
//! - `http` - Axum endpoint exposing the agent

pub mod ai;
pub mod http;
pub mod product;
