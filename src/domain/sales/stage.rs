//! Sales stages and customer interest levels.
//!
//! The script runs Discovery → Presentation → Commitment → Action in order.
//! Objection is a cross-cutting sub-protocol: it can interrupt any stage and
//! hands control back to a stage at or beyond the one it interrupted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::StateMachine;

/// A stage of the scripted sales conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesStage {
    /// Greeting and a single question about how the customer uses a pen.
    Discovery,

    /// Product features tied to the customer's need, closed with a
    /// temperature check ("how does that sound").
    Presentation,

    /// Acknowledge excitement, invite questions, then offer the link.
    Commitment,

    /// Close the sale: provide the purchase link.
    Action,

    /// Five-step objection handling, invocable from any stage.
    Objection,
}

impl SalesStage {
    /// All stages in script order, Objection last.
    pub const ALL: [SalesStage; 5] = [
        SalesStage::Discovery,
        SalesStage::Presentation,
        SalesStage::Commitment,
        SalesStage::Action,
        SalesStage::Objection,
    ];

    /// Position in the primary script, or `None` for Objection.
    pub fn script_rank(&self) -> Option<u8> {
        match self {
            Self::Discovery => Some(0),
            Self::Presentation => Some(1),
            Self::Commitment => Some(2),
            Self::Action => Some(3),
            Self::Objection => None,
        }
    }

    /// Canonical tag used in the metadata line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Discovery => "Discovery",
            Self::Presentation => "Presentation",
            Self::Commitment => "Commitment",
            Self::Action => "Action",
            Self::Objection => "Objection",
        }
    }

    /// Returns true for the Objection sub-protocol.
    pub fn is_objection(&self) -> bool {
        matches!(self, Self::Objection)
    }

    /// Returns true if `self` is at or past `other` in the primary script.
    ///
    /// Objection has no rank and is never at or beyond a primary stage.
    pub fn is_at_or_beyond(&self, other: &Self) -> bool {
        match (self.script_rank(), other.script_rank()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        }
    }
}

impl StateMachine for SalesStage {
    fn can_transition_to(&self, target: &Self) -> bool {
        match (self, target) {
            (_, Self::Objection) => true,
            // Where Objection may resume depends on the stage it interrupted,
            // which is carried on the stage cursor rather than here.
            (Self::Objection, _) => true,
            (from, to) => to.is_at_or_beyond(from),
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|target| self.can_transition_to(target))
            .collect()
    }
}

impl fmt::Display for SalesStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SalesStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

/// Coarse read of how interested the customer is, self-reported each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestLevel {
    Cold,
    Warm,
    Hot,
}

impl InterestLevel {
    pub const ALL: [InterestLevel; 3] = [InterestLevel::Cold, InterestLevel::Warm, InterestLevel::Hot];

    /// Canonical lowercase value used in the metadata line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
        }
    }
}

impl fmt::Display for InterestLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for InterestLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stage_basics {
        use super::*;

        #[test]
        fn serializes_to_snake_case() {
            let json = serde_json::to_string(&SalesStage::Presentation).unwrap();
            assert_eq!(json, "\"presentation\"");
        }

        #[test]
        fn parses_labels_case_insensitively() {
            assert_eq!("discovery".parse::<SalesStage>(), Ok(SalesStage::Discovery));
            assert_eq!("ACTION".parse::<SalesStage>(), Ok(SalesStage::Action));
            assert_eq!(" Objection ".parse::<SalesStage>(), Ok(SalesStage::Objection));
        }

        #[test]
        fn rejects_unknown_tags() {
            assert_eq!("Temperature".parse::<SalesStage>(), Err("Temperature".to_string()));
        }

        #[test]
        fn display_matches_label() {
            for stage in SalesStage::ALL {
                assert_eq!(stage.to_string(), stage.label());
            }
        }
    }

    mod ordering {
        use super::*;

        #[test]
        fn primary_stages_are_ranked_in_script_order() {
            assert!(SalesStage::Action.is_at_or_beyond(&SalesStage::Commitment));
            assert!(SalesStage::Presentation.is_at_or_beyond(&SalesStage::Presentation));
            assert!(!SalesStage::Discovery.is_at_or_beyond(&SalesStage::Presentation));
        }

        #[test]
        fn objection_has_no_rank() {
            assert_eq!(SalesStage::Objection.script_rank(), None);
            assert!(!SalesStage::Objection.is_at_or_beyond(&SalesStage::Discovery));
        }

        #[test]
        fn primary_stages_never_regress() {
            assert!(SalesStage::Commitment.transition_to(SalesStage::Presentation).is_err());
            assert!(SalesStage::Action.transition_to(SalesStage::Discovery).is_err());
            assert_eq!(
                SalesStage::Presentation.transition_to(SalesStage::Action),
                Ok(SalesStage::Action)
            );
        }

        #[test]
        fn objection_reachable_from_every_stage() {
            for stage in SalesStage::ALL {
                assert!(stage.can_transition_to(&SalesStage::Objection));
            }
        }

        #[test]
        fn action_only_stays_or_objects() {
            assert_eq!(
                SalesStage::Action.valid_transitions(),
                vec![SalesStage::Action, SalesStage::Objection]
            );
            assert!(!SalesStage::Action.is_terminal());
        }
    }

    mod interest {
        use super::*;

        #[test]
        fn parses_case_insensitively() {
            assert_eq!("HOT".parse::<InterestLevel>(), Ok(InterestLevel::Hot));
            assert_eq!("warm".parse::<InterestLevel>(), Ok(InterestLevel::Warm));
        }

        #[test]
        fn rejects_unknown_levels() {
            assert!("lukewarm".parse::<InterestLevel>().is_err());
        }

        #[test]
        fn serializes_lowercase() {
            assert_eq!(serde_json::to_string(&InterestLevel::Cold).unwrap(), "\"cold\"");
        }
    }
}
