//! Decision makers and the loop that connects them to an environment.
//!
//! ```text
//!            ┌──────────── Session ────────────┐
//! Environment ─ observe ─> prompt ─> Agent ─> resolve ─> act
//!                                      │
//!        RemoteAgent / OllamaAgent / ScriptedAgent / StdinAgent
//! ```
//!
//! [`server::PredictServer`] exposes any [`Agent`] over HTTP so that a game
//! loop can run on another machine.

mod ollama;
mod remote;
mod retry;
mod scripted;
pub mod server;
pub mod session;
mod stdin;

use std::future::Future;

use thiserror::Error;

pub use ollama::{DEFAULT_OLLAMA_HOST, DEFAULT_OLLAMA_MODEL, OllamaAgent};
pub use remote::RemoteAgent;
pub use retry::RetryPolicy;
pub use scripted::ScriptedAgent;
pub use server::{PredictServer, ServerError};
pub use session::{RunReport, Session, SessionError, Step, StopReason, StopSignal};
pub use stdin::StdinAgent;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("agent returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed agent response: {0}")]
    Decode(String),

    #[error("agent reported an error: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scripted agent has no replies left")]
    Exhausted,
}

/// Input for one decision
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    /// Base64-encoded images
    pub images: Vec<String>,
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }
}

/// Anything that can answer a prompt.
///
/// `Ok(None)` means the agent produced no answer; the loop substitutes the
/// default action.
pub trait Agent: Send + Sync {
    fn respond(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<Option<String>, AgentError>> + Send;
}

/// Closed set of agents selectable from configuration
pub enum AnyAgent {
    Remote(RemoteAgent),
    Ollama(OllamaAgent),
    Scripted(ScriptedAgent),
    Stdin(StdinAgent),
}

impl AnyAgent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Remote(_) => "remote",
            Self::Ollama(_) => "ollama",
            Self::Scripted(_) => "scripted",
            Self::Stdin(_) => "stdin",
        }
    }
}

impl Agent for AnyAgent {
    async fn respond(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        match self {
            Self::Remote(agent) => agent.respond(prompt).await,
            Self::Ollama(agent) => agent.respond(prompt).await,
            Self::Scripted(agent) => agent.respond(prompt).await,
            Self::Stdin(agent) => agent.respond(prompt).await,
        }
    }
}

impl<A: Agent> Agent for std::sync::Arc<A> {
    fn respond(
        &self,
        prompt: &Prompt,
    ) -> impl Future<Output = Result<Option<String>, AgentError>> + Send {
        (**self).respond(prompt)
    }
}
