//! The one pen this agent sells.

use crate::ports::ProductKnowledge;

const FACTS: &[(&str, &str)] = &[
    ("Product", "One-of-a-kind luxury fountain pen"),
    ("Price", "$5000 USD"),
    ("Ink", "Premium black ink cartridge"),
    ("Body", "Titanium case encrusted with hand-set diamonds"),
    (
        "Ideal for",
        "Signing important documents, gifting VIP clients, showcasing executive style",
    ),
];

/// Static fact sheet for the luxury pen.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuxuryPenFacts;

impl ProductKnowledge for LuxuryPenFacts {
    fn fact_sheet(&self) -> String {
        FACTS
            .iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
