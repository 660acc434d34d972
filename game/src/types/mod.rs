//! Static catalogs and decoded records

mod maps;
mod moves;
mod party;
mod pokemon_type;
mod species;
mod status;
mod world;

pub use maps::map_name;
pub use moves::Move;
pub use party::{PartyPokemon, StatExp, Stats};
pub use pokemon_type::Type;
pub use species::Species;
pub use status::Status;
pub use world::{BattleData, Context, GameSummary, Position};
