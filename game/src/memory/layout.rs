/// Offsets of the six party structs from the party size byte
pub const PARTY_SLOT_OFFSETS: [u16; 6] = [0x08, 0x34, 0x60, 0x8C, 0xB8, 0xE4];

/// Base addresses the decoder reads from. Defaults match Pokemon Red.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLayout {
    pub party_size: u16,
    pub badges: u16,
    pub player_x: u16,
    pub player_y: u16,
    pub map_id: u16,
    pub battle_flag: u16,
    pub opponent_species: u16,
    pub opponent_level: u16,
    pub opponent_hp: u16,
    pub opponent_max_hp: u16,
}

impl MemoryLayout {
    pub const POKEMON_RED: MemoryLayout = MemoryLayout {
        party_size: 0xD163,
        badges: 0xD356,
        player_x: 0xD362,
        player_y: 0xD361,
        map_id: 0xD35E,
        battle_flag: 0xD057,
        opponent_species: 0xD058,
        opponent_level: 0xD059,
        opponent_hp: 0xD05A,
        opponent_max_hp: 0xD05C,
    };

    /// First byte of a party struct, `None` if the slot does not exist or
    /// the struct would start past the address space
    pub(crate) fn party_slot(&self, slot: usize) -> Option<u16> {
        PARTY_SLOT_OFFSETS
            .get(slot)
            .and_then(|offset| self.party_size.checked_add(*offset))
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        Self::POKEMON_RED
    }
}

/// Field offsets inside one party struct
pub(crate) mod party {
    pub const SPECIES: u16 = 0x00;
    pub const CURRENT_HP: u16 = 0x01;
    pub const LEVEL: u16 = 0x03;
    pub const STATUS: u16 = 0x04;
    pub const TYPE1: u16 = 0x05;
    pub const TYPE2: u16 = 0x06;
    pub const CATCH_RATE: u16 = 0x07;
    pub const MOVES: u16 = 0x08;
    pub const TRAINER_ID: u16 = 0x0C;
    pub const EXPERIENCE: u16 = 0x0E;
    pub const HP_EXP: u16 = 0x11;
    pub const ATTACK_EXP: u16 = 0x13;
    pub const DEFENSE_EXP: u16 = 0x15;
    pub const SPEED_EXP: u16 = 0x17;
    pub const SPECIAL_EXP: u16 = 0x19;
    pub const IV_DATA: u16 = 0x1B;
    pub const PP: u16 = 0x1D;
    pub const STATS_LEVEL: u16 = 0x21;
    pub const MAX_HP: u16 = 0x22;
    pub const ATTACK: u16 = 0x24;
    pub const DEFENSE: u16 = 0x26;
    pub const SPEED: u16 = 0x28;
    pub const SPECIAL: u16 = 0x2A;
}
