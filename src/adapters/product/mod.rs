//! Product knowledge adapters.

mod luxury_pen;

pub use luxury_pen::LuxuryPenFacts;
