//! Timed button press sequences

use pallet_protocol::ButtonAction;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::device::{DeviceError, SignalSink};

/// Frames a button is held down
pub const DEFAULT_PRESS_STEP: u32 = 8;
/// Frames consumed by one action, press included
pub const DEFAULT_ACTION_FREQUENCY: u32 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("press_step must be at least 1")]
    ZeroPressStep,

    #[error(
        "action_frequency ({action_frequency}) must exceed press_step ({press_step})"
    )]
    FrequencyTooShort {
        press_step: u32,
        action_frequency: u32,
    },
}

/// Whether the device can take more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub press_step: u32,
    pub action_frequency: u32,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            press_step: DEFAULT_PRESS_STEP,
            action_frequency: DEFAULT_ACTION_FREQUENCY,
        }
    }
}

/// Turns one action into press, hold, release and settle phases.
///
/// Every action advances the device by exactly `action_frequency` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionExecutor {
    press_step: u32,
    action_frequency: u32,
}

impl ActionExecutor {
    pub fn new(press_step: u32, action_frequency: u32) -> Result<Self, ExecutorError> {
        if press_step == 0 {
            return Err(ExecutorError::ZeroPressStep);
        }
        if action_frequency <= press_step {
            return Err(ExecutorError::FrequencyTooShort {
                press_step,
                action_frequency,
            });
        }
        Ok(Self {
            press_step,
            action_frequency,
        })
    }

    pub fn from_config(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        Self::new(config.press_step, config.action_frequency)
    }

    pub fn press_step(&self) -> u32 {
        self.press_step
    }

    pub fn action_frequency(&self) -> u32 {
        self.action_frequency
    }

    /// Run one action on `sink`. Stops at the first halt.
    pub fn execute<S, A>(&self, sink: &mut S, action: A, render: bool) -> Result<Flow, DeviceError>
    where
        S: SignalSink + ?Sized,
        A: ButtonAction,
    {
        let (press, release) = action.signals();

        sink.send(press)?;
        if !sink.advance(self.press_step, true)? {
            return Ok(Flow::Halted);
        }

        sink.send(release)?;
        let settle = self.action_frequency - self.press_step - 1;
        if settle > 0 && !sink.advance(settle, render)? {
            return Ok(Flow::Halted);
        }

        // Last frame always renders so the next observation is current
        if !sink.advance(1, true)? {
            return Ok(Flow::Halted);
        }

        Ok(Flow::Continue)
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self {
            press_step: DEFAULT_PRESS_STEP,
            action_frequency: DEFAULT_ACTION_FREQUENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SnapshotDevice;
    use crate::memory::Ram;
    use pallet_protocol::{Button, PokemonAction, Signal};

    /// Records every call in order
    #[derive(Default)]
    struct Trace {
        calls: Vec<String>,
    }

    impl SignalSink for Trace {
        fn send(&mut self, signal: Signal) -> Result<(), DeviceError> {
            self.calls.push(format!("{signal:?}"));
            Ok(())
        }

        fn advance(&mut self, steps: u32, render: bool) -> Result<bool, DeviceError> {
            self.calls.push(format!("advance({steps}, {render})"));
            Ok(true)
        }
    }

    #[test]
    fn test_execute_sequence() {
        let executor = ActionExecutor::default();
        let mut trace = Trace::default();

        let flow = executor
            .execute(&mut trace, PokemonAction::A, false)
            .unwrap();

        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            trace.calls,
            vec![
                "Press(A)",
                "advance(8, true)",
                "Release(A)",
                "advance(1, false)",
                "advance(1, true)",
            ]
        );
    }

    #[test]
    fn test_every_action_takes_action_frequency_steps() {
        let executor = ActionExecutor::new(3, 12).unwrap();
        let mut device = SnapshotDevice::new(Ram::new());

        for action in [PokemonAction::Up, PokemonAction::Start, PokemonAction::B] {
            let before = device.steps();
            executor.execute(&mut device, action, false).unwrap();
            assert_eq!(device.steps() - before, 12);
        }
        assert_eq!(
            &device.signals()[..2],
            &[Signal::Press(Button::Up), Signal::Release(Button::Up)]
        );
    }

    #[test]
    fn test_minimal_frequency_skips_settle_phase() {
        let executor = ActionExecutor::new(1, 2).unwrap();
        let mut trace = Trace::default();

        executor
            .execute(&mut trace, PokemonAction::B, true)
            .unwrap();

        assert_eq!(
            trace.calls,
            vec!["Press(B)", "advance(1, true)", "Release(B)", "advance(1, true)"]
        );
    }

    #[test]
    fn test_halt_stops_sequence() {
        let executor = ActionExecutor::default();
        let mut device = SnapshotDevice::new(Ram::new()).halt_after(4);

        let flow = executor
            .execute(&mut device, PokemonAction::A, true)
            .unwrap();

        assert_eq!(flow, Flow::Halted);
        assert_eq!(device.signals(), &[Signal::Press(Button::A)]);
    }

    #[test]
    fn test_invalid_timing_rejected() {
        assert_eq!(
            ActionExecutor::new(0, 10),
            Err(ExecutorError::ZeroPressStep)
        );
        assert_eq!(
            ActionExecutor::new(8, 8),
            Err(ExecutorError::FrequencyTooShort {
                press_step: 8,
                action_frequency: 8
            })
        );
        assert!(ActionExecutor::from_config(&ExecutorConfig::default()).is_ok());
    }

    #[test]
    fn test_config_fills_missing_fields() {
        let config: ExecutorConfig = serde_json::from_str(r#"{"press_step": 4}"#).unwrap();

        assert_eq!(
            config,
            ExecutorConfig {
                press_step: 4,
                action_frequency: DEFAULT_ACTION_FREQUENCY
            }
        );
    }
}
