use thiserror::Error;

use super::layout::{MemoryLayout, party};
use super::{MemoryError, MemorySource};
use crate::types::{
    BattleData, Context, GameSummary, Move, PartyPokemon, Position, Species, StatExp, Stats, Type,
};

/// Number of party slots
pub const PARTY_CAPACITY: usize = 6;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("party slot {0} is out of range (expected 0..6)")]
    SlotOutOfRange(i32),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Fixed-offset reads over a memory source.
///
/// Every call goes back to memory; nothing is cached between calls.
pub struct MemoryDecoder<'a, M: ?Sized> {
    memory: &'a M,
    layout: MemoryLayout,
}

impl<'a, M: MemorySource + ?Sized> MemoryDecoder<'a, M> {
    /// Decoder over `memory` with the Pokemon Red layout
    pub fn new(memory: &'a M) -> Self {
        Self::with_layout(memory, MemoryLayout::default())
    }

    pub fn with_layout(memory: &'a M, layout: MemoryLayout) -> Self {
        Self { memory, layout }
    }

    pub fn layout(&self) -> &MemoryLayout {
        &self.layout
    }

    pub fn read_u8(&self, addr: u16) -> Result<u8, MemoryError> {
        self.memory.read(addr)
    }

    /// Two bytes, first byte high
    pub fn read_u16(&self, addr: u16) -> Result<u16, MemoryError> {
        let high = self.memory.read(addr)? as u16;
        let low = self.memory.read(offset(addr, 1)?)? as u16;
        Ok((high << 8) | low)
    }

    /// Three bytes, first byte high
    pub fn read_u24(&self, addr: u16) -> Result<u32, MemoryError> {
        let b0 = self.memory.read(addr)? as u32;
        let b1 = self.memory.read(offset(addr, 1)?)? as u32;
        let b2 = self.memory.read(offset(addr, 2)?)? as u32;
        Ok((b0 << 16) | (b1 << 8) | b2)
    }

    /// Decode one party struct. The slot is checked before any memory access.
    pub fn decode_party_slot(&self, slot: i32) -> Result<PartyPokemon, DecodeError> {
        let base = usize::try_from(slot)
            .ok()
            .and_then(|index| self.layout.party_slot(index))
            .ok_or(DecodeError::SlotOutOfRange(slot))?;

        let u8_at = |field: u16| -> Result<u8, MemoryError> { self.read_u8(offset(base, field)?) };
        let u16_at =
            |field: u16| -> Result<u16, MemoryError> { self.read_u16(offset(base, field)?) };

        let mut moves = [Move::NONE; 4];
        let mut pp = [0u8; 4];
        for i in 0..4u16 {
            moves[i as usize] = Move(u8_at(party::MOVES + i)?);
            pp[i as usize] = u8_at(party::PP + i)?;
        }

        Ok(PartyPokemon {
            species: Species(u8_at(party::SPECIES)?),
            current_hp: u16_at(party::CURRENT_HP)?,
            level: u8_at(party::LEVEL)?,
            status: u8_at(party::STATUS)?,
            type1: Type::from_byte(u8_at(party::TYPE1)?),
            type2: Type::from_byte(u8_at(party::TYPE2)?),
            catch_rate: u8_at(party::CATCH_RATE)?,
            moves,
            trainer_id: u16_at(party::TRAINER_ID)?,
            experience: self.read_u24(offset(base, party::EXPERIENCE)?)?,
            stat_exp: StatExp {
                hp: u16_at(party::HP_EXP)?,
                attack: u16_at(party::ATTACK_EXP)?,
                defense: u16_at(party::DEFENSE_EXP)?,
                speed: u16_at(party::SPEED_EXP)?,
                special: u16_at(party::SPECIAL_EXP)?,
            },
            iv_data: u16_at(party::IV_DATA)?,
            pp,
            stats: Stats {
                level: u8_at(party::STATS_LEVEL)?,
                max_hp: u16_at(party::MAX_HP)?,
                attack: u16_at(party::ATTACK)?,
                defense: u16_at(party::DEFENSE)?,
                speed: u16_at(party::SPEED)?,
                special: u16_at(party::SPECIAL)?,
            },
        })
    }

    pub fn decode_position(&self) -> Result<Position, MemoryError> {
        Ok(Position {
            x: self.read_u8(self.layout.player_x)?,
            y: self.read_u8(self.layout.player_y)?,
            map_id: self.read_u8(self.layout.map_id)?,
        })
    }

    pub fn is_in_battle(&self) -> Result<bool, MemoryError> {
        Ok(self.read_u8(self.layout.battle_flag)? != 0)
    }

    /// Opponent data, `None` outside of battle
    pub fn decode_battle_data(&self) -> Result<Option<BattleData>, MemoryError> {
        if !self.is_in_battle()? {
            return Ok(None);
        }

        Ok(Some(BattleData {
            opponent_species: Species(self.read_u8(self.layout.opponent_species)?),
            opponent_level: self.read_u8(self.layout.opponent_level)?,
            opponent_hp: self.read_u16(self.layout.opponent_hp)?,
            opponent_max_hp: self.read_u16(self.layout.opponent_max_hp)?,
        }))
    }

    /// Raw party size byte
    pub fn decode_party_size(&self) -> Result<u8, MemoryError> {
        self.read_u8(self.layout.party_size)
    }

    /// Number of badges, one bit per badge
    pub fn decode_badge_count(&self) -> Result<u32, MemoryError> {
        Ok(self.read_u8(self.layout.badges)?.count_ones())
    }

    pub fn context(&self) -> Result<Context, MemoryError> {
        if self.is_in_battle()? {
            return Ok(Context::Battle);
        }
        if self.read_u8(self.layout.map_id)? == 0 {
            return Ok(Context::Menu);
        }
        Ok(Context::Overworld)
    }

    /// Decode the occupied party slots
    pub fn decode_party(&self) -> Result<Vec<PartyPokemon>, DecodeError> {
        let size = self.decode_party_size()?;
        let count = (size as usize).min(PARTY_CAPACITY);
        if size as usize > PARTY_CAPACITY {
            tracing::warn!(
                party_size = size,
                "Party size byte exceeds capacity, clamping"
            );
        }

        (0..count as i32)
            .map(|slot| self.decode_party_slot(slot))
            .collect()
    }

    pub fn summary(&self) -> Result<GameSummary, DecodeError> {
        Ok(GameSummary {
            context: self.context()?,
            position: self.decode_position()?,
            badges: self.decode_badge_count()?,
            battle: self.decode_battle_data()?,
            party: self.decode_party()?,
        })
    }
}

fn offset(base: u16, delta: u16) -> Result<u16, MemoryError> {
    base.checked_add(delta)
        .ok_or(MemoryError::Unmapped(base as u32 + delta as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, PARTY_SLOT_OFFSETS, Ram};
    use crate::types::Status;

    const PARTY: u16 = 0xD163;

    /// Party struct bytes for a Pokemon whose fields are derived from `seed`
    fn party_struct(seed: u8) -> [u8; 0x2C] {
        let mut raw = [0u8; 0x2C];
        raw[0x00] = 0x99 + seed; // species
        raw[0x01..0x03].copy_from_slice(&[0x01, 0x10 + seed]); // hp
        raw[0x03] = 5 + seed; // level
        raw[0x04] = 0x08; // poisoned
        raw[0x05] = 0x16; // grass
        raw[0x06] = 0x03; // poison
        raw[0x07] = 45;
        raw[0x08..0x0C].copy_from_slice(&[0x21, 0x2D, 0x49, 0x00]);
        raw[0x0C..0x0E].copy_from_slice(&[0xBE, 0xEF]);
        raw[0x0E..0x11].copy_from_slice(&[0x00, 0x01, 0x35 + seed]);
        raw[0x11..0x13].copy_from_slice(&[0x00, 0x11]);
        raw[0x13..0x15].copy_from_slice(&[0x00, 0x13]);
        raw[0x15..0x17].copy_from_slice(&[0x00, 0x15]);
        raw[0x17..0x19].copy_from_slice(&[0x00, 0x17]);
        raw[0x19..0x1B].copy_from_slice(&[0x00, 0x19]);
        raw[0x1B..0x1D].copy_from_slice(&[0xA5, 0x5A]);
        raw[0x1D..0x21].copy_from_slice(&[35, 40, 10, 0]);
        raw[0x21] = 5 + seed;
        raw[0x22..0x24].copy_from_slice(&[0x01, 0x20 + seed]);
        raw[0x24..0x26].copy_from_slice(&[0x00, 11]);
        raw[0x26..0x28].copy_from_slice(&[0x00, 12]);
        raw[0x28..0x2A].copy_from_slice(&[0x00, 13]);
        raw[0x2A..0x2C].copy_from_slice(&[0x00, 14]);
        raw
    }

    fn full_party() -> Ram {
        let mut ram = Ram::new();
        ram.write(PARTY, 6).unwrap();
        for (slot, offset) in PARTY_SLOT_OFFSETS.iter().enumerate() {
            ram.write_all(PARTY + offset, &party_struct(slot as u8))
                .unwrap();
        }
        ram
    }

    #[test]
    fn test_read_u16_first_byte_high() {
        let mut ram = Ram::new();
        ram.write_all(0x1000, &[0x12, 0x34]).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(decoder.read_u16(0x1000).unwrap(), 0x1234);
    }

    #[test]
    fn test_read_u24_first_byte_high() {
        let mut ram = Ram::new();
        ram.write_all(0x2000, &[0x01, 0x02, 0x03]).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(decoder.read_u24(0x2000).unwrap(), 0x010203);
    }

    #[test]
    fn test_read_past_address_space() {
        let ram = Ram::new();
        let decoder = MemoryDecoder::new(&ram);

        assert!(matches!(
            decoder.read_u16(0xFFFF),
            Err(MemoryError::Unmapped(0x10000))
        ));
    }

    #[test]
    fn test_decode_every_party_slot() {
        let ram = full_party();
        let decoder = MemoryDecoder::new(&ram);

        for slot in 0..6 {
            let seed = slot as u8;
            let pokemon = decoder.decode_party_slot(slot).unwrap();

            assert_eq!(pokemon.species, Species(0x99 + seed));
            assert_eq!(pokemon.current_hp, 0x0110 + seed as u16);
            assert_eq!(pokemon.level, 5 + seed);
            assert_eq!(pokemon.status_condition(), Some(Status::Poison));
            assert_eq!(pokemon.type1, Type::Grass);
            assert_eq!(pokemon.type2, Type::Poison);
            assert_eq!(pokemon.catch_rate, 45);
            assert_eq!(
                pokemon.moves,
                [Move(0x21), Move(0x2D), Move(0x49), Move(0x00)]
            );
            assert_eq!(pokemon.trainer_id, 0xBEEF);
            assert_eq!(pokemon.experience, 0x000135 + seed as u32);
            assert_eq!(
                pokemon.stat_exp,
                StatExp {
                    hp: 0x11,
                    attack: 0x13,
                    defense: 0x15,
                    speed: 0x17,
                    special: 0x19
                }
            );
            assert_eq!(pokemon.iv_data, 0xA55A);
            assert_eq!(pokemon.pp, [35, 40, 10, 0]);
            assert_eq!(
                pokemon.stats,
                Stats {
                    level: 5 + seed,
                    max_hp: 0x0120 + seed as u16,
                    attack: 11,
                    defense: 12,
                    speed: 13,
                    special: 14
                }
            );
        }
    }

    #[test]
    fn test_slot_out_of_range_reads_nothing() {
        struct Untouchable;
        impl MemorySource for Untouchable {
            fn read(&self, _addr: u16) -> Result<u8, MemoryError> {
                panic!("memory must not be read for an invalid slot");
            }
        }

        let decoder = MemoryDecoder::new(&Untouchable);

        assert!(matches!(
            decoder.decode_party_slot(6),
            Err(DecodeError::SlotOutOfRange(6))
        ));
        assert!(matches!(
            decoder.decode_party_slot(-1),
            Err(DecodeError::SlotOutOfRange(-1))
        ));
    }

    #[test]
    fn test_decode_position_and_badges() {
        let mut ram = Ram::new();
        ram.write(0xD362, 7).unwrap();
        ram.write(0xD361, 3).unwrap();
        ram.write(0xD35E, 0x0C).unwrap();
        ram.write(0xD356, 0b1010_0001).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        let position = decoder.decode_position().unwrap();
        assert_eq!(
            position,
            Position {
                x: 7,
                y: 3,
                map_id: 0x0C
            }
        );
        assert_eq!(position.map_name(), Some("ROUTE_1"));
        assert_eq!(decoder.decode_badge_count().unwrap(), 3);
        assert_eq!(decoder.context().unwrap(), Context::Overworld);
    }

    #[test]
    fn test_battle_data_only_in_battle() {
        let mut ram = Ram::new();
        ram.write_all(0xD058, &[0xA5, 4, 0x00, 0x0F, 0x00, 0x14])
            .unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(decoder.decode_battle_data().unwrap(), None);
        assert_eq!(decoder.context().unwrap(), Context::Menu);

        ram.write(0xD057, 1).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(
            decoder.decode_battle_data().unwrap(),
            Some(BattleData {
                opponent_species: Species(0xA5),
                opponent_level: 4,
                opponent_hp: 15,
                opponent_max_hp: 20
            })
        );
        assert_eq!(decoder.context().unwrap(), Context::Battle);
    }

    #[test]
    fn test_decode_party_clamps_size() {
        let mut ram = full_party();
        ram.write(PARTY, 0xFF).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(decoder.decode_party().unwrap().len(), 6);

        ram.write(PARTY, 2).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        assert_eq!(decoder.decode_party().unwrap().len(), 2);
    }

    #[test]
    fn test_summary_renders() {
        let mut ram = full_party();
        ram.write(PARTY, 1).unwrap();
        ram.write(0xD35E, 0x28).unwrap();
        let decoder = MemoryDecoder::new(&ram);

        let summary = decoder.summary().unwrap();
        let text = summary.to_string();

        assert_eq!(summary.party.len(), 1);
        assert!(text.contains("Context: overworld"));
        assert!(text.contains("Location: OAKS_LAB (0, 0)"));
        assert!(text.contains("BULBASAUR Lv5 HP 272/288 [GRASS/POISON] PSN"));
        assert!(text.contains("TACKLE (35)"));
    }
}
