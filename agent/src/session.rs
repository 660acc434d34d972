use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pallet_game::{EnvError, Environment, Flow};
use pallet_protocol::{Action, AgentReply, Diagnostics, Resolution, resolve};
use thiserror::Error;

use crate::{Agent, Prompt};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Environment(#[from] EnvError),
}

/// Shared stop flag, checked once per iteration
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise this signal when the process receives Ctrl-C
    pub fn raise_on_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Interrupt received, stopping after the current step");
                    signal.raise();
                }
                Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Signal,
    Halted,
    StepLimit,
}

/// Outcome of [`Session::run`]
#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: u64,
    pub reason: StopReason,
    pub diagnostics: Diagnostics,
}

/// One iteration's outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<A> {
    pub resolution: Resolution<A>,
    pub flow: Flow,
}

/// Drives an environment with an agent: observe, prompt, decide, validate, act.
pub struct Session<E, G> {
    env: E,
    agent: G,
    stop: StopSignal,
    max_steps: Option<u64>,
    diagnostics: Diagnostics,
}

impl<E: Environment, G: Agent> Session<E, G> {
    pub fn new(env: E, agent: G) -> Self {
        Self {
            env,
            agent,
            stop: StopSignal::new(),
            max_steps: None,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<u64>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Start a new episode's counters
    pub fn reset_diagnostics(&mut self) {
        self.diagnostics.reset();
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn agent(&self) -> &G {
        &self.agent
    }

    pub fn into_parts(self) -> (E, G) {
        (self.env, self.agent)
    }

    /// Run one full iteration
    pub async fn step(&mut self) -> Result<Step<E::Action>, SessionError> {
        let state = self.env.observe()?;
        let prompt = self.env.prompt(&state);
        tracing::debug!(env = self.env.name(), prompt = %prompt, "Prompting agent");

        let reply = self.decide(&prompt).await;
        let resolution = resolve(&reply, &state.legal_actions, &mut self.diagnostics);
        let action = resolution.action();
        self.diagnostics.record_step(action);

        match &resolution {
            Resolution::Accepted { strategy, .. } => {
                tracing::debug!(
                    action = action.name(),
                    strategy = strategy.as_str(),
                    "Action accepted"
                );
            }
            Resolution::Fallback { reason, .. } => {
                tracing::info!(action = action.name(), reason = ?reason, "Using fallback action");
            }
        }

        let flow = self.env.act(action)?;
        Ok(Step { resolution, flow })
    }

    /// Loop until stopped, halted or out of steps
    pub async fn run(&mut self) -> Result<RunReport, SessionError> {
        let mut steps = 0;

        let reason = loop {
            if self.stop.is_raised() {
                break StopReason::Signal;
            }
            if self.max_steps.is_some_and(|max| steps >= max) {
                break StopReason::StepLimit;
            }

            let step = self.step().await?;
            steps += 1;

            if step.flow == Flow::Halted {
                break StopReason::Halted;
            }
        };

        tracing::info!(
            env = self.env.name(),
            steps = steps,
            reason = ?reason,
            invalid_actions = self.diagnostics.invalid_actions,
            fallbacks = self.diagnostics.fallbacks(),
            "Session finished"
        );

        Ok(RunReport {
            steps,
            reason,
            diagnostics: self.diagnostics.clone(),
        })
    }

    async fn decide(&self, prompt: &str) -> AgentReply {
        match self.agent.respond(&Prompt::text(prompt)).await {
            Ok(reply) => {
                tracing::debug!(reply = ?reply, "Agent replied");
                AgentReply::from(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Agent failed, using default action");
                AgentReply::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScriptedAgent;
    use pallet_game::{ActionExecutor, GridEnvironment, PokemonEnvironment, Ram, SnapshotDevice};
    use pallet_protocol::{FallbackReason, GridAction, PokemonAction, Strategy};

    fn grid() -> GridEnvironment {
        GridEnvironment::new(8, 6).unwrap()
    }

    #[tokio::test]
    async fn test_scripted_agent_walks_the_grid() {
        let agent = ScriptedAgent::from_texts([
            "<answer>right</answer>",
            "I should go down, down.",
            "\\boxed{\\text{right}}",
        ]);
        let mut session = Session::new(grid(), agent).with_max_steps(Some(3));

        let report = session.run().await.unwrap();

        assert_eq!(report.steps, 3);
        assert_eq!(report.reason, StopReason::StepLimit);
        assert_eq!(
            report.diagnostics.action_history,
            vec!["right", "down", "right"]
        );
        assert_eq!(report.diagnostics.fallbacks(), 0);
        assert_eq!(session.environment().grid().player(), (2, 3));

        let (_, agent) = session.into_parts();
        let prompts = agent.prompts();
        assert_eq!(prompts.len(), 3);
        assert!(prompts[0].contains("[down, right]"));
        assert!(prompts[1].contains("[down, left, right]"));
    }

    #[tokio::test]
    async fn test_illegal_reply_uses_default() {
        let agent = ScriptedAgent::from_texts(["<answer>left</answer>"]);
        let mut session = Session::new(grid(), agent);

        let step = session.step().await.unwrap();

        assert_eq!(
            step.resolution,
            Resolution::Fallback {
                action: GridAction::Up,
                reason: FallbackReason::Illegal("left".to_string())
            }
        );
        assert_eq!(session.diagnostics().invalid_actions, 1);
        assert_eq!(session.environment().grid().player(), (1, 1));
    }

    #[tokio::test]
    async fn test_agent_failure_is_recovered() {
        let agent = ScriptedAgent::new(Vec::new());
        let mut session = Session::new(grid(), agent).with_max_steps(Some(2));

        let report = session.run().await.unwrap();

        assert_eq!(report.steps, 2);
        assert_eq!(report.diagnostics.agent_failures, 2);
        assert_eq!(report.diagnostics.action_history, vec!["up", "up"]);
    }

    #[tokio::test]
    async fn test_stop_signal_checked_before_step() {
        let agent = ScriptedAgent::from_texts(["down"]).cycling();
        let stop = StopSignal::new();
        let mut session = Session::new(grid(), agent).with_stop_signal(stop.clone());
        stop.raise();

        let report = session.run().await.unwrap();

        assert_eq!(report.steps, 0);
        assert_eq!(report.reason, StopReason::Signal);
        assert!(session.agent().prompts().is_empty());
    }

    #[tokio::test]
    async fn test_halted_device_ends_run() {
        let device = SnapshotDevice::new(Ram::new()).halt_after(25);
        let env = PokemonEnvironment::new(device, ActionExecutor::default(), true);
        let agent = ScriptedAgent::from_texts(["<answer>start</answer>"]).cycling();
        let mut session = Session::new(env, agent);

        let report = session.run().await.unwrap();

        assert_eq!(report.reason, StopReason::Halted);
        assert_eq!(report.steps, 3);
        assert_eq!(report.diagnostics.action_history, vec!["start"; 3]);
    }

    #[tokio::test]
    async fn test_no_answer_counts_and_defaults() {
        let device = SnapshotDevice::new(Ram::new());
        let env = PokemonEnvironment::new(device, ActionExecutor::default(), true);
        let agent = ScriptedAgent::new(vec![None]);
        let mut session = Session::new(env, agent);

        let step = session.step().await.unwrap();

        assert_eq!(step.resolution.action(), PokemonAction::B);
        assert_eq!(session.diagnostics().no_answers, 1);

        session.reset_diagnostics();
        assert_eq!(session.diagnostics().total_steps, 0);
    }

    #[tokio::test]
    async fn test_accepted_strategy_is_reported() {
        let agent = ScriptedAgent::from_texts(["<answer>DOWN</answer>"]);
        let mut session = Session::new(grid(), agent);

        let step = session.step().await.unwrap();

        assert_eq!(
            step.resolution,
            Resolution::Accepted {
                action: GridAction::Down,
                strategy: Strategy::AnswerTag
            }
        );
        assert_eq!(step.flow, Flow::Continue);
    }
}
