//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Hosted language model producing each reply
//! - `ProductKnowledge` - Facts about the pen being sold

mod ai_provider;
mod product_knowledge;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    OutputContent, OutputItem, RequestMetadata, TokenUsage,
};
pub use product_knowledge::ProductKnowledge;
