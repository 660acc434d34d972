//! Environment/agent contract shared by every pallet crate.
//!
//! An agent answers a prompt with free-form text. This crate turns that text
//! into exactly one action from a closed vocabulary:
//!
//! ```text
//! raw text ──> ResponseParser ──> ActionValidator ──> Resolution<A>
//!                (tag, boxed,       (legal set,
//!                 majority)          default)
//! ```
//!
//! Nothing here ever fails on bad agent output. Unusable replies resolve to
//! the vocabulary's default action and are counted in [`Diagnostics`].

use thiserror::Error;

pub mod action;
pub mod parser;
pub mod validate;
pub mod wire;

pub use action::{Action, Button, ButtonAction, GridAction, PokemonAction, Signal, describe};
pub use parser::{Interpretation, ResponseParser, Strategy, strip_reasoning};
pub use validate::{
    ActionValidator, AgentReply, DiagnosticEvent, Diagnostics, FallbackReason, Resolution, resolve,
};
pub use wire::{PredictRequest, PredictResponse, parse_valid_actions};

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Empty message")]
    EmptyMessage,
}
