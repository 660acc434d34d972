use std::collections::VecDeque;

use crate::action::Action;
use crate::parser::{Interpretation, ResponseParser, Strategy};

/// Upper bound on retained diagnostic events
pub const MAX_EVENTS: usize = 256;

/// Upper bound on retained action names
pub const MAX_HISTORY: usize = 1024;

/// What an agent produced for one prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    Text(String),
    NoAnswer,
    Failed(String),
}

impl From<Option<String>> for AgentReply {
    fn from(reply: Option<String>) -> Self {
        match reply {
            Some(text) => Self::Text(text),
            None => Self::NoAnswer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    NoAnswer,
    AgentFailure(String),
    /// Raw text (or extracted span) that named no action
    Unrecognized(String),
    /// Name of a recognized action outside the legal set
    Illegal(String),
}

/// Final outcome of turning a reply into an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<A> {
    Accepted { action: A, strategy: Strategy },
    Fallback { action: A, reason: FallbackReason },
}

impl<A: Action> Resolution<A> {
    pub fn action(&self) -> A {
        match self {
            Self::Accepted { action, .. } | Self::Fallback { action, .. } => *action,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// `raw` is the agent text the action was extracted from
    IllegalAction { action: &'static str, raw: String },
    Unrecognized { raw: String },
    NoAnswer,
    AgentFailure { message: String },
}

/// Per-episode counters and recent events, owned by whoever drives the loop.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub total_steps: u64,
    pub invalid_actions: u64,
    pub unrecognized_responses: u64,
    pub no_answers: u64,
    pub agent_failures: u64,
    /// Most recent actions, oldest first
    pub action_history: VecDeque<&'static str>,
    events: VecDeque<DiagnosticEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything at an episode boundary
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record_step<A: Action>(&mut self, action: A) {
        self.total_steps += 1;
        if self.action_history.len() == MAX_HISTORY {
            self.action_history.pop_front();
        }
        self.action_history.push_back(action.name());
    }

    pub fn record(&mut self, event: DiagnosticEvent) {
        if self.events.len() == MAX_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Most recent events, oldest first
    pub fn events(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter()
    }

    /// Total number of replies that did not yield a legal action directly
    pub fn fallbacks(&self) -> u64 {
        self.invalid_actions + self.unrecognized_responses + self.no_answers + self.agent_failures
    }
}

/// Enforces membership in the legal action set
pub struct ActionValidator;

impl ActionValidator {
    /// Return `candidate` if legal, otherwise count it and return the default.
    pub fn validate<A: Action>(candidate: A, legal: &[A], diagnostics: &mut Diagnostics) -> A {
        Self::validate_reply(candidate, candidate.name(), legal, diagnostics)
    }

    /// Like [`validate`](Self::validate), recording `raw` (the agent text
    /// `candidate` was parsed from) when it is rejected.
    pub fn validate_reply<A: Action>(
        candidate: A,
        raw: &str,
        legal: &[A],
        diagnostics: &mut Diagnostics,
    ) -> A {
        if legal.contains(&candidate) {
            return candidate;
        }

        diagnostics.invalid_actions += 1;
        tracing::warn!(
            action = candidate.name(),
            raw = %raw,
            invalid_actions = diagnostics.invalid_actions,
            "Invalid action, falling back to default"
        );
        diagnostics.record(DiagnosticEvent::IllegalAction {
            action: candidate.name(),
            raw: raw.to_string(),
        });

        A::DEFAULT
    }
}

/// Parse and validate one agent reply against `legal`.
pub fn resolve<A: Action>(
    reply: &AgentReply,
    legal: &[A],
    diagnostics: &mut Diagnostics,
) -> Resolution<A> {
    let raw = match reply {
        AgentReply::Text(text) if !text.trim().is_empty() => text,
        AgentReply::Text(_) | AgentReply::NoAnswer => {
            diagnostics.no_answers += 1;
            tracing::warn!("No answer from agent, using default action");
            diagnostics.record(DiagnosticEvent::NoAnswer);
            return Resolution::Fallback {
                action: A::DEFAULT,
                reason: FallbackReason::NoAnswer,
            };
        }
        AgentReply::Failed(message) => {
            diagnostics.agent_failures += 1;
            diagnostics.record(DiagnosticEvent::AgentFailure {
                message: message.clone(),
            });
            return Resolution::Fallback {
                action: A::DEFAULT,
                reason: FallbackReason::AgentFailure(message.clone()),
            };
        }
    };

    let unrecognized = match ResponseParser::interpret(raw) {
        Interpretation::Matched { action, strategy } => {
            if legal.contains(&action) {
                return Resolution::Accepted { action, strategy };
            }
            return Resolution::Fallback {
                action: ActionValidator::validate_reply(action, raw.trim(), legal, diagnostics),
                reason: FallbackReason::Illegal(action.name().to_string()),
            };
        }
        Interpretation::Unrecognized { candidate, .. } => candidate,
        Interpretation::Empty => raw.trim().to_string(),
    };

    diagnostics.unrecognized_responses += 1;
    tracing::warn!(raw = %unrecognized, "Unrecognized agent response, using default action");
    diagnostics.record(DiagnosticEvent::Unrecognized {
        raw: unrecognized.clone(),
    });

    Resolution::Fallback {
        action: A::DEFAULT,
        reason: FallbackReason::Unrecognized(unrecognized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridAction, PokemonAction};

    #[test]
    fn test_validate_legal_is_unchanged() {
        let mut diagnostics = Diagnostics::new();
        let action = ActionValidator::validate(
            PokemonAction::Start,
            PokemonAction::ALL,
            &mut diagnostics,
        );

        assert_eq!(action, PokemonAction::Start);
        assert_eq!(diagnostics.invalid_actions, 0);
    }

    #[test]
    fn test_validate_illegal_counts_once() {
        let mut diagnostics = Diagnostics::new();
        let legal = [PokemonAction::A, PokemonAction::B];
        let action = ActionValidator::validate(PokemonAction::Start, &legal, &mut diagnostics);

        assert_eq!(action, PokemonAction::B);
        assert_eq!(diagnostics.invalid_actions, 1);
        assert_eq!(
            diagnostics.events().collect::<Vec<_>>(),
            vec![&DiagnosticEvent::IllegalAction {
                action: "start",
                raw: "start".to_string()
            }]
        );
    }

    #[test]
    fn test_resolve_accepts_tagged_answer() {
        let mut diagnostics = Diagnostics::new();
        let reply = AgentReply::Text("<answer>right</answer>".to_string());
        let resolution = resolve(&reply, GridAction::ALL, &mut diagnostics);

        assert_eq!(
            resolution,
            Resolution::Accepted {
                action: GridAction::Right,
                strategy: Strategy::AnswerTag
            }
        );
        assert_eq!(diagnostics.fallbacks(), 0);
    }

    #[test]
    fn test_resolve_illegal_falls_back() {
        let mut diagnostics = Diagnostics::new();
        let reply = AgentReply::Text("<answer>left</answer>".to_string());
        let legal = [GridAction::Down, GridAction::Right];
        let resolution = resolve(&reply, &legal, &mut diagnostics);

        assert_eq!(
            resolution,
            Resolution::Fallback {
                action: GridAction::Up,
                reason: FallbackReason::Illegal("left".to_string())
            }
        );
        assert_eq!(diagnostics.invalid_actions, 1);
        assert_eq!(
            diagnostics.events().last(),
            Some(&DiagnosticEvent::IllegalAction {
                action: "left",
                raw: "<answer>left</answer>".to_string()
            })
        );
    }

    #[test]
    fn test_resolve_illegal_majority_reaches_validator() {
        let mut diagnostics = Diagnostics::new();
        let reply = AgentReply::Text("go left, left, left... or down".to_string());
        let legal = [PokemonAction::Down, PokemonAction::Start];
        let resolution = resolve(&reply, &legal, &mut diagnostics);

        assert_eq!(
            resolution,
            Resolution::Fallback {
                action: PokemonAction::B,
                reason: FallbackReason::Illegal("left".to_string())
            }
        );
        assert_eq!(diagnostics.invalid_actions, 1);
        assert_eq!(
            diagnostics.events().collect::<Vec<_>>(),
            vec![&DiagnosticEvent::IllegalAction {
                action: "left",
                raw: "go left, left, left... or down".to_string()
            }]
        );
    }

    #[test]
    fn test_resolve_no_answer_and_failure() {
        let mut diagnostics = Diagnostics::new();

        let none = resolve::<PokemonAction>(
            &AgentReply::NoAnswer,
            PokemonAction::ALL,
            &mut diagnostics,
        );
        let blank = resolve::<PokemonAction>(
            &AgentReply::Text("  \n".to_string()),
            PokemonAction::ALL,
            &mut diagnostics,
        );
        let failed = resolve::<PokemonAction>(
            &AgentReply::Failed("connection refused".to_string()),
            PokemonAction::ALL,
            &mut diagnostics,
        );

        assert_eq!(none.action(), PokemonAction::B);
        assert_eq!(blank.action(), PokemonAction::B);
        assert_eq!(
            failed,
            Resolution::Fallback {
                action: PokemonAction::B,
                reason: FallbackReason::AgentFailure("connection refused".to_string())
            }
        );
        assert_eq!(diagnostics.no_answers, 2);
        assert_eq!(diagnostics.agent_failures, 1);
        assert_eq!(diagnostics.invalid_actions, 0);
    }

    #[test]
    fn test_resolve_unrecognized() {
        let mut diagnostics = Diagnostics::new();
        let reply = AgentReply::Text("<answer>jump</answer>".to_string());
        let resolution = resolve(&reply, GridAction::ALL, &mut diagnostics);

        assert_eq!(
            resolution,
            Resolution::Fallback {
                action: GridAction::Up,
                reason: FallbackReason::Unrecognized("jump".to_string())
            }
        );
        assert_eq!(diagnostics.unrecognized_responses, 1);
    }

    #[test]
    fn test_events_are_bounded() {
        let mut diagnostics = Diagnostics::new();
        for _ in 0..MAX_EVENTS + 10 {
            diagnostics.record(DiagnosticEvent::NoAnswer);
        }

        assert_eq!(diagnostics.events().count(), MAX_EVENTS);
    }

    #[test]
    fn test_action_history_is_bounded() {
        let mut diagnostics = Diagnostics::new();
        for _ in 0..MAX_HISTORY {
            diagnostics.record_step(GridAction::Up);
        }
        diagnostics.record_step(GridAction::Right);

        assert_eq!(diagnostics.total_steps, MAX_HISTORY as u64 + 1);
        assert_eq!(diagnostics.action_history.len(), MAX_HISTORY);
        assert_eq!(diagnostics.action_history.back(), Some(&"right"));
    }

    #[test]
    fn test_record_step_and_reset() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record_step(GridAction::Left);
        diagnostics.record_step(GridAction::Down);
        diagnostics.invalid_actions = 3;

        assert_eq!(diagnostics.total_steps, 2);
        assert_eq!(diagnostics.action_history, vec!["left", "down"]);

        diagnostics.reset();

        assert_eq!(diagnostics.total_steps, 0);
        assert_eq!(diagnostics.invalid_actions, 0);
        assert!(diagnostics.action_history.is_empty());
    }
}
