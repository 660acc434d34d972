
use std::sync::LazyLock;

use regex::Regex;

use crate::action::Action;

static ANSWER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<answer>(.*?)</answer>").expect("answer tag pattern"));

static BOXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\boxed\{\\text\{(.*?)\}\}").expect("boxed pattern"));

static THINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("think pattern"));

/// Which extraction step produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `<answer>...</answer>`
    AnswerTag,
    /// `\boxed{\text{...}}`
    Boxed,
    /// Most frequent action name in the text outside `<think>` spans
    Majority,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnswerTag => "answer_tag",
            Self::Boxed => "boxed",
            Self::Majority => "majority",
        }
    }
}

/// What the parser made of a raw reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation<A> {
    Matched { action: A, strategy: Strategy },
    /// A strategy matched, but its span does not name any action
    Unrecognized {
        candidate: String,
        strategy: Strategy,
    },
    /// No strategy produced a candidate
    Empty,
}

impl<A: Action> Interpretation<A> {
    pub fn action(&self) -> Option<A> {
        match self {
            Self::Matched { action, .. } => Some(*action),
            _ => None,
        }
    }
}

/// Turns free-form agent text into one action of a vocabulary
pub struct ResponseParser;

impl ResponseParser {
    /// Parse `raw`, substituting `default` when nothing usable is found.
    ///
    /// The result may lie outside the legal set; membership is checked by
    /// [`ActionValidator`](crate::ActionValidator).
    pub fn parse<A: Action>(raw: &str, _legal: &[A], default: A) -> A {
        Self::interpret(raw).action().unwrap_or(default)
    }

    /// Run the extraction chain and report which step answered.
    ///
    /// The first strategy whose delimiters are present is final, even if its
    /// span is empty or names no action.
    pub fn interpret<A: Action>(raw: &str) -> Interpretation<A> {
        if let Some(span) = first_span(&ANSWER_TAG, raw) {
            return recognize(span, Strategy::AnswerTag);
        }

        if let Some(span) = first_span(&BOXED, raw) {
            return recognize(span, Strategy::Boxed);
        }

        match majority(raw) {
            Some(action) => Interpretation::Matched {
                action,
                strategy: Strategy::Majority,
            },
            None => Interpretation::Empty,
        }
    }
}

/// Remove every `<think>...</think>` span
pub fn strip_reasoning(raw: &str) -> String {
    THINK.replace_all(raw, "").into_owned()
}

fn first_span<'a>(pattern: &Regex, raw: &'a str) -> Option<&'a str> {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn recognize<A: Action>(span: &str, strategy: Strategy) -> Interpretation<A> {
    let candidate = span.trim().to_lowercase();
    if candidate.is_empty() {
        return Interpretation::Empty;
    }

    match A::from_name(&candidate) {
        Some(action) => Interpretation::Matched { action, strategy },
        None => Interpretation::Unrecognized {
            candidate,
            strategy,
        },
    }
}

fn majority<A: Action>(raw: &str) -> Option<A> {
    let text = strip_reasoning(raw).to_lowercase();
    let mut best: Option<(A, usize)> = None;

    // Declaration order, so a tie keeps the earlier action
    for action in A::ALL.iter().copied() {
        let count = text.matches(action.name()).count();
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((action, count)),
        }
    }

    best.map(|(action, _)| action)
}
