//! Utterance signals.
//!
//! Classifies a customer utterance into the coarse signals the stage
//! transition rules look at. Matching is case-insensitive and respects word
//! boundaries, so "hi" does not fire on "this".

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "hiya",
    "howdy",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
];

const PRODUCT_QUESTIONS: &[&str] = &[
    "how much",
    "price",
    "cost",
    "costs",
    "tell me about",
    "tell me more",
    "feature",
    "features",
    "what is it",
    "made of",
    "material",
    "ink",
    "titanium",
    "diamond",
    "diamonds",
    "details",
    "specs",
];

const NEEDS: &[&str] = &[
    "sign",
    "signing",
    "signature",
    "signatures",
    "write",
    "writing",
    "notes",
    "journal",
    "journaling",
    "work",
    "office",
    "business",
    "gift",
    "gifting",
    "documents",
    "contracts",
    "letters",
    "drawing",
    "sketching",
    "school",
    "collection",
];

const AFFIRMATIVES: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "yup",
    "sure",
    "nice",
    "great",
    "good",
    "ok",
    "okay",
    "perfect",
    "awesome",
    "cool",
    "amazing",
    "excellent",
    "interested",
    "absolutely",
    "definitely",
    "of course",
    "sounds good",
    "sounds great",
    "love it",
    "i like it",
];

/// Price words. A statement ("seems expensive") is a concern; a plain
/// question ("is it expensive?") is a product question.
const PRICE_CONCERNS: &[&str] = &["expensive", "pricey", "costly"];

/// Words that turn a following purchase term into a refusal.
const NEGATORS: &[&str] = &[
    "don't", "dont", "do not", "won't", "wont", "will not", "not", "never", "no", "can't",
    "cannot",
];

/// Clause boundaries that end the reach of a negator.
const CLAUSE_BREAKS: &[char] = &['.', ',', '!', '?', ';'];

const NEGATIVES: &[&str] = &[
    "too much",
    "overpriced",
    "can't afford",
    "cannot afford",
    "not good",
    "not interested",
    "not sure",
    "not worth",
    "don't like",
    "dont like",
    "do not like",
    "don't need",
    "dont need",
    "no thanks",
    "no thank you",
    "waste",
    "hate",
    "bad",
    "ugly",
    "worried",
    "concern",
    "concerned",
    "doubt",
    "cheaper",
    "rip off",
    "ripoff",
];

const FLAT_NOS: &[&str] = &["no", "nope", "nah", "not really", "no way"];

const DECLINES_QUESTIONS: &[&str] = &[
    "no more questions",
    "no questions",
    "no other questions",
    "no further questions",
    "nothing else",
    "that's all",
    "that's it",
    "that is all",
    "all good",
    "all clear",
];

const LINK_REQUESTS: &[&str] = &[
    "send link",
    "send me the link",
    "send the link",
    "send me a link",
    "the link",
    "buy",
    "buy it",
    "purchase",
    "checkout",
    "place an order",
    "i'll take it",
    "ill take it",
    "i want it",
    "i want one",
    "take my money",
    "how do i pay",
    "where do i pay",
    "sign me up",
];

/// Signals extracted from a single customer utterance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UtteranceSignals {
    /// Opens with or contains a greeting.
    pub greeting: bool,
    /// Asks about price, materials, or features.
    pub product_question: bool,
    /// Describes what the customer would use the pen for.
    pub states_need: bool,
    /// Positive or agreeing reply.
    pub affirmative: bool,
    /// Nothing but a bare "no".
    pub flat_no: bool,
    /// Declines further questions ("no more questions").
    pub declines_questions: bool,
    /// Asks for the link or otherwise wants to buy now.
    pub requests_link: bool,
    /// Contains a question mark or asks about the product.
    pub asks_question: bool,
    /// Concern or negative sentiment that calls for objection handling.
    pub negative: bool,
}

impl UtteranceSignals {
    /// Classifies an utterance.
    pub fn from_text(text: &str) -> Self {
        let normalized = normalize(text);
        let bare = normalized.trim_matches(|c: char| !c.is_alphanumeric());
        let is_question = normalized.contains('?');

        let price_concern = contains_any(&normalized, PRICE_CONCERNS);
        let price_query = price_concern && is_question && !contains_term(&normalized, "too");
        let product_question = contains_any(&normalized, PRODUCT_QUESTIONS) || price_query;

        let (link_request, refused_purchase) = LINK_REQUESTS.iter().fold(
            (false, false),
            |(wanted, refused), term| match term_polarity(&normalized, term) {
                Some(true) => (wanted, true),
                Some(false) => (true, refused),
                None => (wanted, refused),
            },
        );

        Self {
            greeting: contains_any(&normalized, GREETINGS),
            product_question,
            states_need: contains_any(&normalized, NEEDS),
            affirmative: contains_any(&normalized, AFFIRMATIVES),
            flat_no: FLAT_NOS.iter().any(|no| *no == bare),
            declines_questions: contains_any(&normalized, DECLINES_QUESTIONS),
            requests_link: link_request && !refused_purchase,
            asks_question: is_question || product_question,
            negative: contains_any(&normalized, NEGATIVES)
                || (price_concern && !price_query)
                || refused_purchase,
        }
    }

    /// True when the utterance is a greeting and carries no other signal.
    pub fn is_greeting_only(&self) -> bool {
        self.greeting
            && !self.product_question
            && !self.states_need
            && !self.affirmative
            && !self.flat_no
            && !self.declines_questions
            && !self.requests_link
            && !self.negative
    }
}

/// Lowercases text and folds typographic apostrophes into ASCII ones.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

/// Returns true if `term` occurs in `haystack` on word boundaries.
///
/// Both arguments are expected to be normalized already.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    word_matches(haystack, term).next().is_some()
}

/// Looks up `term` in `haystack`. Returns `None` if absent, `Some(true)` if
/// every occurrence follows a negator in the same clause, `Some(false)`
/// otherwise.
fn term_polarity(haystack: &str, term: &str) -> Option<bool> {
    let mut found = false;
    for start in word_matches(haystack, term) {
        found = true;
        let clause = haystack[..start]
            .rsplit(CLAUSE_BREAKS)
            .next()
            .unwrap_or_default();
        if !contains_any(clause, NEGATORS) {
            return Some(false);
        }
    }
    found.then_some(true)
}

fn word_matches<'a>(haystack: &'a str, term: &'a str) -> impl Iterator<Item = usize> + 'a {
    haystack
        .match_indices(term)
        .filter(move |(start, matched)| {
            let end = start + matched.len();
            let before = haystack[..*start].chars().next_back();
            let after = haystack[end..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .map(|(start, _)| start)
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| contains_term(haystack, term))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}
