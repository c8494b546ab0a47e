//! The sales script as data.
//!
//! Each stage is a [`StageRule`]: when it may be entered, which closing
//! phrases it must use, and which phrases it must never use. The table is
//! built once per process and only read afterwards. The transition engine
//! consults the entry conditions; the validator consults the phrase sets;
//! the orchestrator renders the whole table into provider instructions.

use once_cell::sync::Lazy;
use std::fmt::Write as _;

use super::signals::UtteranceSignals;
use super::stage::{InterestLevel, SalesStage};
use super::transition::TurnPlan;
use super::turn::StageCursor;

/// A family of interchangeable phrases. A reply satisfies the family if it
/// contains any one of them.
#[derive(Debug, Clone, Copy)]
pub struct PhraseFamily {
    /// Short name used in diagnostics.
    pub name: &'static str,
    pub phrases: &'static [&'static str],
}

impl PhraseFamily {
    /// Returns the first phrase of this family found in `normalized` text.
    pub fn find_in(&self, normalized: &str) -> Option<&'static str> {
        self.phrases.iter().copied().find(|phrase| normalized.contains(phrase))
    }
}

/// Predicate deciding whether a stage may be entered on this turn.
#[derive(Clone, Copy)]
pub struct EntryCondition {
    /// Human readable trigger, rendered into the provider instructions.
    pub description: &'static str,
    admits: fn(Option<&StageCursor>, &UtteranceSignals) -> bool,
}

impl EntryCondition {
    /// Returns true if the stage may be entered given the prior cursor and
    /// the signals of the new utterance.
    pub fn admits(&self, prior: Option<&StageCursor>, signals: &UtteranceSignals) -> bool {
        (self.admits)(prior, signals)
    }
}

impl std::fmt::Debug for EntryCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryCondition")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Declarative definition of one stage.
#[derive(Debug, Clone)]
pub struct StageRule {
    pub stage: SalesStage,
    /// What the agent does in this stage.
    pub directive: &'static str,
    pub entry: EntryCondition,
    /// Every family must be matched by a conforming reply.
    pub required: &'static [PhraseFamily],
    /// No phrase of any of these families may appear in a conforming reply.
    pub forbidden: &'static [PhraseFamily],
    /// Exact number of questions a conforming reply asks, when constrained.
    pub exact_questions: Option<usize>,
}

impl StageRule {
    /// Every forbidden phrase, family by family, each listed once.
    pub fn forbidden_phrases(&self) -> impl Iterator<Item = &'static str> {
        let families: &'static [PhraseFamily] = self.forbidden;
        let mut seen = Vec::new();
        families
            .iter()
            .flat_map(|family| family.phrases.iter().copied())
            .filter(move |phrase| {
                let fresh = !seen.contains(phrase);
                seen.push(*phrase);
                fresh
            })
    }
}

/// One step of the objection micro-script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectionStep {
    Acknowledge,
    Reframe,
    ReconfirmValue,
    CheckReadiness,
    TransitionBack,
}

impl ObjectionStep {
    /// The steps in the order they must be delivered.
    pub const SEQUENCE: [ObjectionStep; 5] = [
        ObjectionStep::Acknowledge,
        ObjectionStep::Reframe,
        ObjectionStep::ReconfirmValue,
        ObjectionStep::CheckReadiness,
        ObjectionStep::TransitionBack,
    ];

    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Acknowledge => "Acknowledge the concern (\"I understand\").",
            Self::Reframe => "Reframe it by explaining the pen's value.",
            Self::ReconfirmValue => "Reconfirm the value by linking it to the customer's stated need.",
            Self::CheckReadiness => "Check readiness (\"Does that sound good?\").",
            Self::TransitionBack => "Transition back (\"Would you like me to send you the link?\").",
        }
    }
}

/// The concrete closing move for the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageCue {
    AskUsage,
    PresentFeatures,
    InviteQuestions,
    AnswerQuestion,
    OfferLink,
    ProvideLink,
    HandleObjection,
}

impl StageCue {
    /// Picks the cue for a stage given the prior cursor and the utterance.
    pub fn for_turn(
        stage: SalesStage,
        prior: Option<&StageCursor>,
        signals: &UtteranceSignals,
    ) -> Self {
        match stage {
            SalesStage::Discovery => Self::AskUsage,
            SalesStage::Presentation => Self::PresentFeatures,
            SalesStage::Commitment if signals.declines_questions || signals.flat_no => {
                Self::OfferLink
            }
            SalesStage::Commitment if signals.asks_question => Self::AnswerQuestion,
            SalesStage::Commitment if prior.is_some_and(StageCursor::link_offered) => {
                Self::OfferLink
            }
            SalesStage::Commitment => Self::InviteQuestions,
            SalesStage::Action => Self::ProvideLink,
            SalesStage::Objection => Self::HandleObjection,
        }
    }

    /// Instruction given to the provider for this cue.
    pub fn directive(&self) -> &'static str {
        match self {
            Self::AskUsage => {
                "Greet the customer and ask ONLY one question about what they usually use a pen for."
            }
            Self::PresentFeatures => {
                "Present the pen's luxury features, connect them to what the customer needs it for, then ask \"How does that sound?\"."
            }
            Self::InviteQuestions => {
                "Acknowledge their excitement (\"Looks like you're excited about our pen\"), then ask \"Do you have any questions?\"."
            }
            Self::AnswerQuestion => {
                "Answer the customer's question directly from the product reference. Do not ask \"how does that sound\" again."
            }
            Self::OfferLink => "Offer to close: ask \"Would you like me to send you the link?\".",
            Self::ProvideLink => {
                "Close the sale: provide the purchase link now (\"Here's your link\"). Do not ask whether to send it."
            }
            Self::HandleObjection => {
                "Handle the objection with all five steps of the objection micro-script, in order."
            }
        }
    }
}

const USAGE_QUESTION: PhraseFamily = PhraseFamily {
    name: "pen usage question",
    phrases: &[
        "what do you usually use a pen for",
        "what do you use a pen for",
        "tell me what you need it for",
        "what do you usually",
        "use a pen",
    ],
};

const PRODUCT_FEATURE: PhraseFamily = PhraseFamily {
    name: "product feature",
    phrases: &["5000", "titanium", "diamond", "black ink", "premium"],
};

const TEMPERATURE_CHECK: PhraseFamily = PhraseFamily {
    name: "temperature check",
    phrases: &["how does that sound"],
};

const COMMITMENT_CLOSER: PhraseFamily = PhraseFamily {
    name: "questions or link offer",
    phrases: &[
        "any questions",
        "anything you'd like to know",
        "would you like me to send you the link",
        "would you like me to",
        "should i send you the link",
        "ready to move forward",
        "keen to grab one",
    ],
};

const ACTION_CLOSER: PhraseFamily = PhraseFamily {
    name: "closing",
    phrases: &[
        "here's your link",
        "here is your link",
        "here's the link",
        "here is the link",
        "i can send you the link",
        "purchase",
        "valid for",
        "grab one here",
    ],
};

const ACKNOWLEDGEMENT: PhraseFamily = PhraseFamily {
    name: "acknowledgement",
    phrases: &[
        "i understand",
        "i hear you",
        "i get it",
        "understandable",
        "totally understand",
        "completely understand",
    ],
};

const READINESS_CHECK: PhraseFamily = PhraseFamily {
    name: "readiness check or transition",
    phrases: &[
        "does that sound good",
        "how does that sound",
        "would you like me to send you the link",
        "should i send you the link",
        "ready to move forward",
    ],
};

const LINK_OFFER: PhraseFamily = PhraseFamily {
    name: "link offer",
    phrases: &[
        "should i send you the link",
        "would you like me to send you the link",
        "want me to send you the link",
    ],
};

const QUESTION_INVITE: PhraseFamily = PhraseFamily {
    name: "question invitation",
    phrases: &["any questions", "questions about it"],
};

const REPEATED_USAGE_QUESTION: PhraseFamily = PhraseFamily {
    name: "repeated usage question",
    phrases: &["what do you use a pen for", "what do you usually use a pen for"],
};

const ALTERNATIVE_OFFER: PhraseFamily = PhraseFamily {
    name: "alternative offer",
    phrases: &["alternative", "cheaper option"],
};

/// Discovery never runs ahead: no closer of any later stage.
const FORBIDDEN_IN_DISCOVERY: &[PhraseFamily] = &[
    TEMPERATURE_CHECK,
    COMMITMENT_CLOSER,
    ACTION_CLOSER,
    LINK_OFFER,
    QUESTION_INVITE,
];

const FORBIDDEN_IN_PRESENTATION: &[PhraseFamily] = &[QUESTION_INVITE, REPEATED_USAGE_QUESTION];

const FORBIDDEN_IN_COMMITMENT: &[PhraseFamily] = &[TEMPERATURE_CHECK, REPEATED_USAGE_QUESTION];

const FORBIDDEN_IN_ACTION: &[PhraseFamily] = &[LINK_OFFER, QUESTION_INVITE, TEMPERATURE_CHECK];

const FORBIDDEN_IN_OBJECTION: &[PhraseFamily] = &[QUESTION_INVITE, ALTERNATIVE_OFFER];

fn prior_stage(prior: Option<&StageCursor>) -> Option<SalesStage> {
    prior.map(StageCursor::stage)
}

fn resumes(prior: Option<&StageCursor>, stage: SalesStage) -> bool {
    prior.is_some_and(|cursor| cursor.stage().is_objection() && cursor.resume_stage() == stage)
}

fn enters_discovery(prior: Option<&StageCursor>, _signals: &UtteranceSignals) -> bool {
    match prior_stage(prior) {
        None | Some(SalesStage::Discovery) => true,
        Some(_) => resumes(prior, SalesStage::Discovery),
    }
}

fn enters_presentation(prior: Option<&StageCursor>, signals: &UtteranceSignals) -> bool {
    match prior_stage(prior) {
        None => signals.product_question || signals.states_need || signals.affirmative,
        Some(SalesStage::Discovery) => !signals.is_greeting_only(),
        Some(SalesStage::Presentation) => true,
        Some(_) => resumes(prior, SalesStage::Presentation),
    }
}

fn enters_commitment(prior: Option<&StageCursor>, signals: &UtteranceSignals) -> bool {
    match prior_stage(prior) {
        None => signals.declines_questions,
        Some(SalesStage::Presentation) => signals.affirmative,
        Some(SalesStage::Commitment) => true,
        Some(_) => resumes(prior, SalesStage::Commitment),
    }
}

fn enters_action(prior: Option<&StageCursor>, signals: &UtteranceSignals) -> bool {
    if signals.requests_link {
        return true;
    }
    let accepts = signals.affirmative && !signals.declines_questions && !signals.asks_question;
    match prior_stage(prior) {
        Some(SalesStage::Commitment) => accepts && prior.is_some_and(StageCursor::link_offered),
        Some(SalesStage::Objection) => accepts || resumes(prior, SalesStage::Action),
        Some(SalesStage::Action) => true,
        Some(_) | None => false,
    }
}

fn enters_objection(prior: Option<&StageCursor>, signals: &UtteranceSignals) -> bool {
    if signals.negative {
        return true;
    }
    matches!(
        prior_stage(prior),
        Some(SalesStage::Presentation) | Some(SalesStage::Objection)
    ) && signals.flat_no
}

static STANDARD_SCRIPT: Lazy<SalesScript> = Lazy::new(|| SalesScript {
    rules: vec![
        StageRule {
            stage: SalesStage::Discovery,
            directive: "Find out what the customer needs the pen for. Ask exactly one question about pen usage. Do not ask about pen usage in any other stage.",
            entry: EntryCondition {
                description: "The customer greets you or starts the conversation (e.g. \"Hi\", \"Hello\").",
                admits: enters_discovery,
            },
            required: &[USAGE_QUESTION],
            forbidden: FORBIDDEN_IN_DISCOVERY,
            exact_questions: Some(1),
        },
        StageRule {
            stage: SalesStage::Presentation,
            directive: "Present the pen's luxury features and link them to the customer's need (e.g. \"perfect for signing\"). Mention the $5000 price, titanium case, diamonds, black ink, or premium quality. Then ask ONLY \"How does that sound?\".",
            entry: EntryCondition {
                description: "The customer answers the discovery question (e.g. \"signing\", \"for work\") or asks about price or features (e.g. \"How much is the pen?\").",
                admits: enters_presentation,
            },
            required: &[PRODUCT_FEATURE, TEMPERATURE_CHECK],
            forbidden: FORBIDDEN_IN_PRESENTATION,
            exact_questions: None,
        },
        StageRule {
            stage: SalesStage::Commitment,
            directive: "Acknowledge their excitement, then ask \"Do you have any questions?\". Answer questions directly. When they have no more questions, ask \"Would you like me to send you the link?\".",
            entry: EntryCondition {
                description: "The customer responds positively to \"how does that sound\" (e.g. \"yes\", \"nice\"), asks a follow-up question, or says they have no more questions.",
                admits: enters_commitment,
            },
            required: &[COMMITMENT_CLOSER],
            forbidden: FORBIDDEN_IN_COMMITMENT,
            exact_questions: None,
        },
        StageRule {
            stage: SalesStage::Action,
            directive: "Close the sale only. Provide the link (\"Here's your link\"), mention the purchase, or say how long the offer is valid for. Never ask again whether to send the link.",
            entry: EntryCondition {
                description: "The customer says yes to \"Would you like me to send you the link?\", asks for the link or to buy (e.g. \"Yes send link\", \"I want to buy\"), or responds positively after an objection was handled.",
                admits: enters_action,
            },
            required: &[ACTION_CLOSER],
            forbidden: FORBIDDEN_IN_ACTION,
            exact_questions: None,
        },
        StageRule {
            stage: SalesStage::Objection,
            directive: "Handle the concern with the five-step micro-script. Do not offer alternatives; stick to selling this pen. Do not ask \"Do you have any questions?\".",
            entry: EntryCondition {
                description: "The customer raises a concern or negative feedback (e.g. \"too expensive\", \"not good\"). Simple yes/no answers are normal flow, not objections.",
                admits: enters_objection,
            },
            required: &[ACKNOWLEDGEMENT, READINESS_CHECK],
            forbidden: FORBIDDEN_IN_OBJECTION,
            exact_questions: None,
        },
    ],
});

/// The ordered set of stage rules.
#[derive(Debug, Clone)]
pub struct SalesScript {
    rules: Vec<StageRule>,
}

impl SalesScript {
    /// The process-wide script.
    pub fn standard() -> &'static SalesScript {
        &STANDARD_SCRIPT
    }

    /// Rules in script order.
    pub fn rules(&self) -> &[StageRule] {
        &self.rules
    }

    /// Rule for a stage.
    pub fn rule(&self, stage: SalesStage) -> &StageRule {
        self.rules
            .iter()
            .find(|rule| rule.stage == stage)
            .unwrap_or_else(|| unreachable!("sales script defines every stage"))
    }

    /// Rules in the order their entry conditions are tried: the objection
    /// sub-protocol first, then the primary stages from furthest to nearest.
    pub fn rules_by_priority(&self) -> impl Iterator<Item = &StageRule> {
        [
            SalesStage::Objection,
            SalesStage::Action,
            SalesStage::Commitment,
            SalesStage::Presentation,
            SalesStage::Discovery,
        ]
        .into_iter()
        .map(move |stage| self.rule(stage))
    }

    /// Renders the full script plus the plan for this turn as system-level
    /// instructions for the provider.
    pub fn render_instructions(&self, plan: &TurnPlan) -> String {
        let mut out = String::new();
        let levels = InterestLevel::ALL.map(|level| level.label()).join("|");
        let stages = SalesStage::ALL.map(|stage| stage.label()).join("|");

        out.push_str(
            "You are a sales agent selling a very fancy, one-of-a-kind pen.\n\
             You are chatting with a customer via SMS.\n\
             Your messages must be short, natural, friendly, and no more than 3 sentences.\n\n",
        );

        out.push_str("STRUCTURED OUTPUT FORMAT (always):\n");
        out.push_str("- Line 1: Your SMS reply (<=3 sentences, on a single line).\n");
        let _ = writeln!(
            out,
            "- Line 2: Metadata in this exact format -> Stage: <{stages}>; Interest: <{levels}>"
        );
        out.push_str("- Nothing else on line 2, and nothing after it.\n\n");

        out.push_str("SALES PROCESS (Discovery -> Presentation -> Commitment -> Action):\n");
        for (index, rule) in self.rules.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", index + 1, rule.stage);
            let _ = writeln!(out, "   When: {}", rule.entry.description);
            let _ = writeln!(out, "   Do: {}", rule.directive);
            for family in rule.required {
                let _ = writeln!(
                    out,
                    "   MUST use one of ({}): {}",
                    family.name,
                    quoted(family.phrases)
                );
            }
            let forbidden: Vec<_> = rule.forbidden_phrases().collect();
            if !forbidden.is_empty() {
                let _ = writeln!(out, "   NEVER say: {}", quoted(&forbidden));
            }
        }

        out.push_str("\nOBJECTION HANDLING (follow ALL steps in order):\n");
        for (index, step) in ObjectionStep::SEQUENCE.iter().enumerate() {
            let _ = writeln!(out, "{}) {}", index + 1, step.instruction());
        }
        out.push_str(
            "After an objection, if the customer responds positively, move DIRECTLY to Action. \
             Do not ask \"Do you have any questions?\" again.\n\n",
        );

        out.push_str("CURRENT TURN:\n");
        let _ = writeln!(out, "- You are in the {} stage.", plan.stage());
        let _ = writeln!(out, "- {}", plan.cue.directive());
        let _ = writeln!(
            out,
            "- Line 2 must read exactly: Stage: {}; Interest: <{levels}>",
            plan.stage()
        );

        out
    }
}

fn quoted(phrases: &[&str]) -> String {
    phrases
        .iter()
        .map(|phrase| format!("\"{phrase}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
