//! Party Pokemon records

use super::moves::Move;
use super::pokemon_type::Type;
use super::species::Species;
use super::status::Status;

/// Stat experience accumulated from defeated Pokemon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatExp {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special: u16,
}

/// Computed stats stored at the tail of the party struct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub level: u8,
    pub max_hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
    pub special: u16,
}

/// One decoded party slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyPokemon {
    pub species: Species,
    pub current_hp: u16,
    pub level: u8,
    /// Raw status byte, see [`PartyPokemon::status_condition`]
    pub status: u8,
    pub type1: Type,
    pub type2: Type,
    pub catch_rate: u8,
    pub moves: [Move; 4],
    pub trainer_id: u16,
    pub experience: u32,
    pub stat_exp: StatExp,
    pub iv_data: u16,
    pub pp: [u8; 4],
    pub stats: Stats,
}

impl PartyPokemon {
    pub fn status_condition(&self) -> Option<Status> {
        Status::from_byte(self.status)
    }

    /// Distinct types; single-typed Pokemon store the same byte twice
    pub fn types(&self) -> Vec<Type> {
        if self.type1 == self.type2 {
            vec![self.type1]
        } else {
            vec![self.type1, self.type2]
        }
    }

    /// Non-empty move slots with their PP
    pub fn known_moves(&self) -> impl Iterator<Item = (Move, u8)> + '_ {
        self.moves
            .iter()
            .zip(self.pp.iter())
            .filter(|(m, _)| !m.is_empty())
            .map(|(m, pp)| (*m, *pp))
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }
}

impl std::fmt::Display for PartyPokemon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self
            .status_condition()
            .map(|s| s.abbreviation())
            .unwrap_or("OK");
        let types: Vec<&str> = self.types().iter().map(|t| t.as_str()).collect();

        write!(
            f,
            "{} Lv{} HP {}/{} [{}] {}",
            self.species,
            self.level,
            self.current_hp,
            self.stats.max_hp,
            types.join("/"),
            status
        )?;

        let moves: Vec<String> = self
            .known_moves()
            .map(|(m, pp)| format!("{m} ({pp})"))
            .collect();
        if !moves.is_empty() {
            write!(f, " moves: {}", moves.join(", "))?;
        }

        Ok(())
    }
}
