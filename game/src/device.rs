//! The seam between the game loop and an emulator

use std::path::Path;

use pallet_protocol::Signal;
use thiserror::Error;

use crate::memory::{MemoryError, MemorySource, Ram};

/// Game Boy LCD width in pixels
pub const SCREEN_WIDTH: u32 = 160;
/// Game Boy LCD height in pixels
pub const SCREEN_HEIGHT: u32 = 144;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device is not running")]
    Stopped,

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Accepts button signals and advances emulated time
pub trait SignalSink {
    fn send(&mut self, signal: Signal) -> Result<(), DeviceError>;

    /// Advance `steps` frames. Returns `false` once the device has halted.
    fn advance(&mut self, steps: u32, render: bool) -> Result<bool, DeviceError>;
}

pub trait Screen {
    fn capture(&self) -> Frame;
}

/// A running game: readable memory, button input and a screen
pub trait Device: MemorySource + SignalSink + Screen {}

impl<T: MemorySource + SignalSink + Screen> Device for T {}

/// One 8-bit greyscale screen capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF; (width * height) as usize],
        }
    }
}

/// Device backed by a fixed RAM image.
///
/// Signals and frame counts are recorded instead of emulated, so memory
/// stays as loaded.
#[derive(Debug, Clone)]
pub struct SnapshotDevice {
    ram: Ram,
    frame: Frame,
    signals: Vec<Signal>,
    steps: u64,
    rendered_steps: u64,
    halt_after: Option<u64>,
}

impl SnapshotDevice {
    pub fn new(ram: Ram) -> Self {
        Self {
            ram,
            frame: Frame::blank(SCREEN_WIDTH, SCREEN_HEIGHT),
            signals: Vec::new(),
            steps: 0,
            rendered_steps: 0,
            halt_after: None,
        }
    }

    pub fn from_dump(path: impl AsRef<Path>) -> Result<Self, MemoryError> {
        Ok(Self::new(Ram::load(path)?))
    }

    /// Report a halt once `steps` frames have elapsed
    pub fn halt_after(mut self, steps: u64) -> Self {
        self.halt_after = Some(steps);
        self
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut Ram {
        &mut self.ram
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Frames advanced so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Frames advanced with rendering on
    pub fn rendered_steps(&self) -> u64 {
        self.rendered_steps
    }

    fn halted(&self) -> bool {
        self.halt_after.is_some_and(|limit| self.steps >= limit)
    }
}

impl MemorySource for SnapshotDevice {
    fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        self.ram.read(addr)
    }
}

impl SignalSink for SnapshotDevice {
    fn send(&mut self, signal: Signal) -> Result<(), DeviceError> {
        if self.halted() {
            return Err(DeviceError::Stopped);
        }
        self.signals.push(signal);
        Ok(())
    }

    fn advance(&mut self, steps: u32, render: bool) -> Result<bool, DeviceError> {
        let steps = match self.halt_after {
            Some(limit) => (steps as u64).min(limit.saturating_sub(self.steps)),
            None => steps as u64,
        };

        self.steps += steps;
        if render {
            self.rendered_steps += steps;
        }

        Ok(!self.halted())
    }
}

impl Screen for SnapshotDevice {
    fn capture(&self) -> Frame {
        self.frame.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pallet_protocol::Button;

    #[test]
    fn test_snapshot_records_signals_and_steps() {
        let mut device = SnapshotDevice::new(Ram::new());
        device.send(Signal::Press(Button::A)).unwrap();
        assert!(device.advance(8, true).unwrap());
        assert!(device.advance(2, false).unwrap());

        assert_eq!(device.signals(), &[Signal::Press(Button::A)]);
        assert_eq!(device.steps(), 10);
        assert_eq!(device.rendered_steps(), 8);
    }

    #[test]
    fn test_snapshot_halts_at_limit() {
        let mut device = SnapshotDevice::new(Ram::new()).halt_after(5);

        assert!(!device.advance(8, false).unwrap());
        assert_eq!(device.steps(), 5);
        assert!(matches!(
            device.send(Signal::Release(Button::A)),
            Err(DeviceError::Stopped)
        ));
    }

    #[test]
    fn test_snapshot_serves_memory_and_screen() {
        let mut ram = Ram::new();
        ram.write(0xD35E, 0x26).unwrap();
        let device = SnapshotDevice::new(ram);

        assert_eq!(device.read(0xD35E).unwrap(), 0x26);
        let frame = device.capture();
        assert_eq!((frame.width, frame.height), (SCREEN_WIDTH, SCREEN_HEIGHT));
        assert_eq!(frame.pixels.len(), (SCREEN_WIDTH * SCREEN_HEIGHT) as usize);
    }
}
