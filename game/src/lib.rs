//! Pokemon Red memory decoding, button execution and playable environments.
//!
//! ```text
//! Device (memory + buttons + screen)
//!    │            ▲
//!    ▼            │
//! MemoryDecoder  ActionExecutor
//!    │            ▲
//!    └──> Environment ──> GameState / prompt
//! ```
//!
//! The emulator itself stays behind the [`Device`] trait. [`SnapshotDevice`]
//! serves a RAM dump for inspection and dry runs.

pub mod device;
pub mod env;
pub mod executor;
pub mod memory;
pub mod types;

pub use device::{Device, DeviceError, Frame, Screen, SignalSink, SnapshotDevice};
pub use env::{
    EnvError, Environment, GameState, Grid, GridEnvironment, Observation, PokemonEnvironment,
    Tile, screen_prompt,
};
pub use executor::{ActionExecutor, ExecutorConfig, ExecutorError, Flow};
pub use memory::{DecodeError, MemoryDecoder, MemoryError, MemoryLayout, MemorySource, Ram};
pub use types::{
    BattleData, Context, GameSummary, Move, PartyPokemon, Position, Species, StatExp, Stats,
    Status, Type, map_name,
};
