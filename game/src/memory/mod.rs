//! Byte-addressable memory and typed reads over it

mod decoder;
mod layout;

use std::path::Path;

use thiserror::Error;

pub use decoder::{DecodeError, MemoryDecoder, PARTY_CAPACITY};
pub use layout::{MemoryLayout, PARTY_SLOT_OFFSETS};

/// Size of the Game Boy address space
pub const ADDRESS_SPACE: usize = 0x1_0000;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("address {0:#06x} is not mapped")]
    Unmapped(u32),

    #[error("memory dump is {0} bytes, larger than the 64 KiB address space")]
    DumpTooLarge(usize),

    #[error("failed to read memory dump: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can serve single-byte reads
pub trait MemorySource {
    fn read(&self, addr: u16) -> Result<u8, MemoryError>;
}

impl<M: MemorySource + ?Sized> MemorySource for &M {
    fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        (**self).read(addr)
    }
}

/// Flat RAM image. Addresses past the loaded length are unmapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ram {
    bytes: Vec<u8>,
}

impl Ram {
    /// Zeroed 64 KiB image
    pub fn new() -> Self {
        Self {
            bytes: vec![0; ADDRESS_SPACE],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, MemoryError> {
        if bytes.len() > ADDRESS_SPACE {
            return Err(MemoryError::DumpTooLarge(bytes.len()));
        }
        Ok(Self { bytes })
    }

    /// Load a raw dump, starting at address 0
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        let slot = self
            .bytes
            .get_mut(addr as usize)
            .ok_or(MemoryError::Unmapped(addr as u32))?;
        *slot = value;
        Ok(())
    }

    /// Write a run of bytes starting at `addr`
    pub fn write_all(&mut self, addr: u16, values: &[u8]) -> Result<(), MemoryError> {
        for (i, value) in values.iter().enumerate() {
            let target = addr as u32 + i as u32;
            let target = u16::try_from(target).map_err(|_| MemoryError::Unmapped(target))?;
            self.write(target, *value)?;
        }
        Ok(())
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySource for Ram {
    fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(MemoryError::Unmapped(addr as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ram_read_write() {
        let mut ram = Ram::new();
        ram.write(0xD163, 3).unwrap();
        ram.write_all(0xFFFE, &[1, 2]).unwrap();

        assert_eq!(ram.read(0xD163).unwrap(), 3);
        assert_eq!(ram.read(0xFFFF).unwrap(), 2);
        assert_eq!(ram.len(), ADDRESS_SPACE);
    }

    #[test]
    fn test_ram_write_past_end_fails() {
        let mut ram = Ram::new();
        let result = ram.write_all(0xFFFF, &[1, 2]);

        assert!(matches!(result, Err(MemoryError::Unmapped(0x10000))));
    }

    #[test]
    fn test_short_dump_leaves_high_addresses_unmapped() {
        let ram = Ram::from_bytes(vec![7; 16]).unwrap();

        assert_eq!(ram.read(15).unwrap(), 7);
        assert!(matches!(ram.read(16), Err(MemoryError::Unmapped(16))));
    }

    #[test]
    fn test_oversized_dump_is_rejected() {
        let result = Ram::from_bytes(vec![0; ADDRESS_SPACE + 1]);

        assert!(matches!(result, Err(MemoryError::DumpTooLarge(_))));
    }
}
