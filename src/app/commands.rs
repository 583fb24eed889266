//! Inbound commands to the device service.
//!
//! Administrative and diagnostic requests from the serial console or a
//! test harness.  None of them are needed for normal operation.

use crate::fsm::DeviceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Force the state machine into a specific state (diagnostics only).
    ForceState(DeviceState),

    /// Return to warm-up as if freshly booted (sensor timer untouched).
    /// A running deterrent is stopped first.
    Reinitialize,

    /// Offer a synthetic remote toggle edge, debounced like a real one.
    SimulateToggle,
}

impl DeviceCommand {
    /// Map a single console character to a command.
    ///
    /// `P` toggles, `R` reinitialises, `0`–`3` force a state by index.
    pub fn from_console(byte: u8) -> Option<Self> {
        match byte {
            b'P' | b'p' => Some(Self::SimulateToggle),
            b'R' | b'r' => Some(Self::Reinitialize),
            b'0'..=b'3' => Some(Self::ForceState(DeviceState::from_index(
                (byte - b'0') as usize,
            ))),
            _ => None,
        }
    }
}
