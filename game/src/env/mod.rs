//! Environments an agent can play

mod grid;
mod pokemon;

use pallet_protocol::Action;
use thiserror::Error;

use crate::device::{DeviceError, Frame};
use crate::executor::Flow;
use crate::memory::{DecodeError, MemoryError};

pub use grid::{DEFAULT_HEIGHT, DEFAULT_WIDTH, Grid, GridEnvironment, Tile};
pub use pokemon::{PokemonEnvironment, screen_prompt};

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error("invalid environment configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Screen(Frame),
    Text(String),
}

/// Snapshot handed to the agent for one decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState<A> {
    pub legal_actions: Vec<A>,
    pub observation: Observation,
    /// Decoded state rendered as text, when the environment can read it
    pub report: Option<String>,
}

pub trait Environment {
    type Action: Action;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn observe(&mut self) -> Result<GameState<Self::Action>, EnvError>;

    /// Render the prompt for a state. Pure formatting.
    fn prompt(&self, state: &GameState<Self::Action>) -> String;

    fn act(&mut self, action: Self::Action) -> Result<Flow, EnvError>;
}

/// Instruction appended to every prompt
pub(crate) fn answer_instruction<A: Action>(example: A) -> String {
    format!(
        "Return the answer using the answer tag, for example if the answer is \"{0}\", return:\n```\n<answer>{0}</answer>\n```",
        example.name()
    )
}
