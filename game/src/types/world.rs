//! Overworld and battle records

use super::maps::map_name;
use super::party::PartyPokemon;
use super::species::Species;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub map_id: u8,
}

impl Position {
    pub fn map_name(&self) -> Option<&'static str> {
        map_name(self.map_id)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.map_name() {
            Some(name) => write!(f, "{name} ({}, {})", self.x, self.y),
            None => write!(f, "map {:#04x} ({}, {})", self.map_id, self.x, self.y),
        }
    }
}

/// Opponent data, only meaningful while the battle flag is set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleData {
    pub opponent_species: Species,
    pub opponent_level: u8,
    pub opponent_hp: u16,
    pub opponent_max_hp: u16,
}

/// Coarse screen context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Battle,
    Menu,
    Overworld,
}

impl Context {
    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Battle => "battle",
            Context::Menu => "menu",
            Context::Overworld => "overworld",
        }
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything the decoder can tell about the current game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub context: Context,
    pub position: Position,
    pub badges: u32,
    pub battle: Option<BattleData>,
    pub party: Vec<PartyPokemon>,
}

impl std::fmt::Display for GameSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Context: {}", self.context)?;
        writeln!(f, "Location: {}", self.position)?;
        writeln!(f, "Badges: {}", self.badges)?;

        if let Some(battle) = &self.battle {
            writeln!(
                f,
                "Opponent: {} Lv{} HP {}/{}",
                battle.opponent_species,
                battle.opponent_level,
                battle.opponent_hp,
                battle.opponent_max_hp
            )?;
        }

        if self.party.is_empty() {
            write!(f, "Party: empty")
        } else {
            write!(f, "Party ({}):", self.party.len())?;
            for (slot, pokemon) in self.party.iter().enumerate() {
                write!(f, "\n  {}. {}", slot + 1, pokemon)?;
            }
            Ok(())
        }
    }
}
