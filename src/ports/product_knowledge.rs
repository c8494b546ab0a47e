//! Product Knowledge Port - Source of the facts the agent may state.
//!
//! The agent must never invent product details. Whatever this port returns
//! is sent to the provider as a reference segment on every turn.

/// Port for the catalogue entry of the product being sold.
pub trait ProductKnowledge: Send + Sync {
    /// Plain-text fact sheet, one fact per line.
    fn fact_sheet(&self) -> String;
}
