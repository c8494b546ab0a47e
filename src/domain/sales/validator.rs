//! Script conformance checks for a reply's customer-facing text.

use serde::Serialize;
use std::fmt;

use super::script::SalesScript;
use super::signals::normalize;
use super::stage::SalesStage;

/// One way a message broke its stage's rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptViolation {
    MissingRequiredPhrase {
        stage: SalesStage,
        family: &'static str,
    },
    ForbiddenPhrase {
        stage: SalesStage,
        phrase: &'static str,
    },
    QuestionCount {
        stage: SalesStage,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for ScriptViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredPhrase { stage, family } => {
                write!(f, "{stage} reply is missing a {family} phrase")
            }
            Self::ForbiddenPhrase { stage, phrase } => {
                write!(f, "{stage} reply uses forbidden phrase {phrase:?}")
            }
            Self::QuestionCount {
                stage,
                expected,
                found,
            } => write!(f, "{stage} reply asks {found} questions, expected {expected}"),
        }
    }
}

/// Checks `message` against the rule for `stage`.
///
/// Returns every violation found, not just the first.
pub fn validate(stage: SalesStage, message: &str) -> Result<(), Vec<ScriptViolation>> {
    let rule = SalesScript::standard().rule(stage);
    let text = normalize(message);
    let mut violations = Vec::new();

    for family in rule.required {
        if family.find_in(&text).is_none() {
            violations.push(ScriptViolation::MissingRequiredPhrase {
                stage,
                family: family.name,
            });
        }
    }

    for phrase in rule.forbidden_phrases() {
        if text.contains(phrase) {
            violations.push(ScriptViolation::ForbiddenPhrase { stage, phrase });
        }
    }

    if let Some(expected) = rule.exact_questions {
        let found = text.matches('?').count();
        if found != expected {
            violations.push(ScriptViolation::QuestionCount {
                stage,
                expected,
                found,
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations(stage: SalesStage, message: &str) -> Vec<ScriptViolation> {
        validate(stage, message).err().unwrap_or_default()
    }

    mod discovery {
        use super::*;

        #[test]
        fn single_usage_question_conforms() {
            assert!(validate(
                SalesStage::Discovery,
                "Hi there! What do you usually use a pen for?"
            )
            .is_ok());
        }

        #[test]
        fn two_questions_violate() {
            let found = violations(
                SalesStage::Discovery,
                "Hi! How are you? What do you usually use a pen for?",
            );
            assert!(found.contains(&ScriptViolation::QuestionCount {
                stage: SalesStage::Discovery,
                expected: 1,
                found: 2,
            }));
        }

        #[test]
        fn every_later_closer_is_forbidden() {
            let script = SalesScript::standard();
            let closers = script
                .rule(SalesStage::Commitment)
                .required
                .iter()
                .chain(script.rule(SalesStage::Action).required)
                .chain(
                    script
                        .rule(SalesStage::Presentation)
                        .required
                        .iter()
                        .filter(|family| family.name == "temperature check"),
                )
                .flat_map(|family| family.phrases.iter());

            for phrase in closers {
                let message = format!("What do you usually use a pen for? {phrase}");
                let found = violations(SalesStage::Discovery, &message);
                assert!(
                    found.iter().any(|v| matches!(
                        v,
                        ScriptViolation::ForbiddenPhrase { stage: SalesStage::Discovery, .. }
                    )),
                    "{phrase} passed in Discovery"
                );
            }
        }

        #[test]
        fn shared_phrase_is_reported_once() {
            let found = violations(
                SalesStage::Discovery,
                "What do you use a pen for? Should I send you the link",
            );
            let reported = found
                .iter()
                .filter(|v| matches!(v, ScriptViolation::ForbiddenPhrase { phrase, .. } if *phrase == "should i send you the link"))
                .count();
            assert_eq!(reported, 1);
        }

        #[test]
        fn temperature_check_is_forbidden() {
            let found = violations(
                SalesStage::Discovery,
                "What do you use a pen for? How does that sound",
            );
            assert!(found
                .iter()
                .any(|v| matches!(v, ScriptViolation::ForbiddenPhrase { phrase, .. } if *phrase == "how does that sound")));
        }
    }

    mod presentation {
        use super::*;

        #[test]
        fn features_with_temperature_check_conform() {
            assert!(validate(
                SalesStage::Presentation,
                "Perfect for signing! It's a $5000 titanium pen with hand-set diamonds. How does that sound?"
            )
            .is_ok());
        }

        #[test]
        fn any_questions_is_forbidden() {
            let found = violations(
                SalesStage::Presentation,
                "It's titanium with diamonds. How does that sound? Any questions?",
            );
            assert_eq!(
                found,
                vec![ScriptViolation::ForbiddenPhrase {
                    stage: SalesStage::Presentation,
                    phrase: "any questions",
                }]
            );
        }

        #[test]
        fn missing_temperature_check_is_reported() {
            let found = violations(SalesStage::Presentation, "It's a titanium pen.");
            assert_eq!(
                found,
                vec![ScriptViolation::MissingRequiredPhrase {
                    stage: SalesStage::Presentation,
                    family: "temperature check",
                }]
            );
        }
    }

    mod closing_stages {
        use super::*;

        #[test]
        fn commitment_invitation_conforms() {
            assert!(validate(
                SalesStage::Commitment,
                "Looks like you're excited about our pen! Do you have any questions?"
            )
            .is_ok());
        }

        #[test]
        fn action_with_link_conforms() {
            assert!(validate(
                SalesStage::Action,
                "Here's your link: https://example.com/pen. The offer is valid for 24 hours."
            )
            .is_ok());
        }

        #[test]
        fn action_must_not_reoffer_link() {
            let found = violations(
                SalesStage::Action,
                "Great! Should I send you the link to purchase?",
            );
            assert_eq!(
                found,
                vec![ScriptViolation::ForbiddenPhrase {
                    stage: SalesStage::Action,
                    phrase: "should i send you the link",
                }]
            );
        }

        #[test]
        fn objection_handling_conforms() {
            assert!(validate(
                SalesStage::Objection,
                "I understand, it's an investment. The titanium and diamonds make it last a lifetime, perfect for your signing. Does that sound good? Would you like me to send you the link?"
            )
            .is_ok());
        }

        #[test]
        fn objection_without_acknowledgement_is_reported() {
            let found = violations(SalesStage::Objection, "It's worth it. Does that sound good?");
            assert_eq!(found.len(), 1);
            assert!(found[0].to_string().contains("acknowledgement"));
        }
    }
}
