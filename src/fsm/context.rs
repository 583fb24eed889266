//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the single struct that state handlers read from and
//! write to: the tick timestamp, the peripheral handles, configuration,
//! and the two pieces of timing state the states own (warm-up flicker
//! and the activation window).

use crate::app::ports::{PeripheralSet, ToggleSource};
use crate::config::DeviceConfig;
use crate::timing::{Millis, elapsed, has_elapsed};

// ---------------------------------------------------------------------------
// Activation window
// ---------------------------------------------------------------------------

/// Rolling hold period of the Active state.
///
/// Opened on entry, pushed forward on every tick that sees motion, and
/// expired once `duration` passes without a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    start: Millis,
    duration: Millis,
}

impl ActivationWindow {
    pub const fn open(now: Millis, duration: Millis) -> Self {
        Self {
            start: now,
            duration,
        }
    }

    /// Restart the hold at `now` (renewed motion).
    pub fn refresh(&mut self, now: Millis) {
        self.start = now;
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        has_elapsed(now, self.start, self.duration)
    }

    /// Milliseconds left before expiry (0 once expired).
    pub fn remaining(&self, now: Millis) -> Millis {
        self.duration.saturating_sub(elapsed(now, self.start))
    }

    pub fn start(&self) -> Millis {
        self.start
    }

    pub fn duration(&self) -> Millis {
        self.duration
    }
}

// ---------------------------------------------------------------------------
// Warm-up flicker
// ---------------------------------------------------------------------------

/// Blue/off blink state of the indicator during warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlickerState {
    last_flip: Millis,
    is_on: bool,
}

impl FlickerState {
    pub const fn new() -> Self {
        Self {
            last_flip: 0,
            is_on: false,
        }
    }

    /// Flip if `period` has elapsed since the last flip.  Returns the new
    /// on/off phase when a flip happened.
    pub fn poll(&mut self, now: Millis, period: Millis) -> Option<bool> {
        if !has_elapsed(now, self.last_flip, period) {
            return None;
        }
        self.is_on = !self.is_on;
        self.last_flip = now;
        Some(self.is_on)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FsmContext<P> {
    // -- Timing --
    /// Timestamp of the tick being processed.
    pub now: Millis,
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,

    // -- Peripherals --
    /// Handles to every peripheral the states read or command.
    pub io: P,

    // -- Configuration --
    pub config: DeviceConfig,

    // -- State-owned timing --
    /// Warm-up indicator blink phase.
    pub flicker: FlickerState,
    /// Present only while Active.
    pub activation: Option<ActivationWindow>,
}

impl<P: PeripheralSet> FsmContext<P> {
    pub fn new(io: P, config: DeviceConfig) -> Self {
        Self {
            now: 0,
            ticks_in_state: 0,
            io,
            config,
            flicker: FlickerState::new(),
            activation: None,
        }
    }

    /// Consume a latched remote toggle, if any.
    pub fn take_toggle(&mut self) -> bool {
        self.io.toggle().check_and_clear()
    }

    /// Clear state-owned timers (boot / reinitialise).
    pub fn reset_timers(&mut self) {
        self.flicker.reset();
        self.activation = None;
    }
}
