//! Gen I type bytes

/// Pokemon types as stored in the party struct type bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    /// Byte outside the Gen I type table
    Unknown(u8),
}

impl Type {
    /// The 15 Gen I types
    pub const ALL: [Type; 15] = [
        Type::Normal,
        Type::Fighting,
        Type::Flying,
        Type::Poison,
        Type::Ground,
        Type::Rock,
        Type::Bug,
        Type::Ghost,
        Type::Fire,
        Type::Water,
        Type::Grass,
        Type::Electric,
        Type::Psychic,
        Type::Ice,
        Type::Dragon,
    ];

    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Type::Normal,
            0x01 => Type::Fighting,
            0x02 => Type::Flying,
            0x03 => Type::Poison,
            0x04 => Type::Ground,
            0x05 => Type::Rock,
            0x07 => Type::Bug,
            0x08 => Type::Ghost,
            0x14 => Type::Fire,
            0x15 => Type::Water,
            0x16 => Type::Grass,
            0x17 => Type::Electric,
            0x18 => Type::Psychic,
            0x19 => Type::Ice,
            0x1A => Type::Dragon,
            other => Type::Unknown(other),
        }
    }

    pub fn to_byte(&self) -> u8 {
        match self {
            Type::Normal => 0x00,
            Type::Fighting => 0x01,
            Type::Flying => 0x02,
            Type::Poison => 0x03,
            Type::Ground => 0x04,
            Type::Rock => 0x05,
            Type::Bug => 0x07,
            Type::Ghost => 0x08,
            Type::Fire => 0x14,
            Type::Water => 0x15,
            Type::Grass => 0x16,
            Type::Electric => 0x17,
            Type::Psychic => 0x18,
            Type::Ice => 0x19,
            Type::Dragon => 0x1A,
            Type::Unknown(byte) => *byte,
        }
    }

    /// Canonical upper-case name, `UNKNOWN` for bytes outside the table
    pub fn as_str(&self) -> &'static str {
        match self {
            Type::Normal => "NORMAL",
            Type::Fighting => "FIGHTING",
            Type::Flying => "FLYING",
            Type::Poison => "POISON",
            Type::Ground => "GROUND",
            Type::Rock => "ROCK",
            Type::Bug => "BUG",
            Type::Ghost => "GHOST",
            Type::Fire => "FIRE",
            Type::Water => "WATER",
            Type::Grass => "GRASS",
            Type::Electric => "ELECTRIC",
            Type::Psychic => "PSYCHIC",
            Type::Ice => "ICE",
            Type::Dragon => "DRAGON",
            Type::Unknown(_) => "UNKNOWN",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Type::Unknown(_))
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Unknown(byte) => write!(f, "UNKNOWN({byte:#04x})"),
            known => write!(f, "{}", known.as_str()),
        }
    }
}
