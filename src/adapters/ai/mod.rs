//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI Responses API with server-side conversation state

mod mock_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse, MOCK_MODEL};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEFAULT_SUPPORTED_MODELS};
