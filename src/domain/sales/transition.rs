//! Stage transition engine.
//!
//! Decides the stage of the next agent reply from the cursor the caller
//! echoed back and the new customer utterance. The decision is made here,
//! before the provider is called, so stage progression never depends on
//! the model honouring the script.

use super::script::{SalesScript, StageCue};
use super::signals::UtteranceSignals;
use super::stage::SalesStage;
use super::turn::StageCursor;

/// What the next reply must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPlan {
    pub cursor: StageCursor,
    pub cue: StageCue,
}

impl TurnPlan {
    pub fn stage(&self) -> SalesStage {
        self.cursor.stage()
    }
}

/// Picks the next stage by trying each stage's entry condition in priority
/// order. The first one that admits the turn wins.
#[derive(Debug, Clone, Copy)]
pub struct StageTransitionEngine {
    script: &'static SalesScript,
}

impl Default for StageTransitionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTransitionEngine {
    pub fn new() -> Self {
        Self {
            script: SalesScript::standard(),
        }
    }

    pub fn script(&self) -> &'static SalesScript {
        self.script
    }

    /// Plans the reply to `user_text`.
    pub fn next_turn(&self, prior: Option<&StageCursor>, user_text: &str) -> TurnPlan {
        let signals = UtteranceSignals::from_text(user_text);

        let (stage, interrupted) = match self
            .script
            .rules_by_priority()
            .find(|rule| rule.entry.admits(prior, &signals))
        {
            Some(rule) if rule.stage.is_objection() => {
                let interrupted = prior.and_then(|cursor| {
                    if cursor.stage().is_objection() {
                        cursor.interrupted()
                    } else {
                        Some(cursor.stage())
                    }
                });
                (rule.stage, interrupted)
            }
            Some(rule) => (rule.stage, None),
            None => prior.map_or((SalesStage::Discovery, None), |cursor| {
                (cursor.stage(), cursor.interrupted())
            }),
        };

        let cue = StageCue::for_turn(stage, prior, &signals);
        let cursor = match (stage, cue) {
            (SalesStage::Objection, _) => StageCursor::objection(interrupted),
            (SalesStage::Commitment, StageCue::OfferLink) => StageCursor::offering_link(),
            (stage, _) => StageCursor::at(stage),
        };

        TurnPlan { cursor, cue }
    }
}
