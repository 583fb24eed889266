//! Port traits: the boundary between the state machine and the peripherals.
//!
//! ```text
//!   Driver ──▶ Port trait ──▶ DeviceStateMachine (domain)
//! ```
//!
//! Peripheral wrappers (PIR, fan, buzzer, LED, remote) implement these
//! traits.  The state machine is generic over them via [`PeripheralSet`],
//! so it never touches a pin and test doubles drop in unchanged.
//!
//! Every trait is also implemented for `&mut T`, which lets a board hand
//! the state machine borrowed handles to drivers it keeps ownership of.

use crate::drivers::status_led::Rgb;
use crate::timing::Millis;

use super::events::DeviceEvent;

// ───────────────────────────────────────────────────────────────
// Motion sensor (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// PIR motion sensor with a settling period.
pub trait MotionSensor {
    /// Arm the warm-up timer at `now`.
    fn initialize(&mut self, now: Millis);

    /// Per-tick update; completes warm-up once its duration has elapsed.
    fn advance(&mut self, now: Millis);

    /// `true` until warm-up has completed.  Only `initialize` sets it
    /// again.
    fn is_stabilizing(&self) -> bool;

    /// Current motion reading.  Always `false` while stabilizing.
    fn is_motion_detected(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Variable-speed output (the fan).
pub trait VariableOutput {
    /// Run at `speed` (0–255; values above are clamped).
    fn on(&mut self, speed: u16);

    /// Stop.  No-op if already stopped.
    fn off(&mut self);

    /// Duty value currently applied (0 = off).
    fn current_speed(&self) -> u8;
}

/// Audible signal with a self-oscillating siren mode.
pub trait AudibleSignal {
    /// Start the two-tone siren at `now`, beginning on the high tone.
    fn start_siren(&mut self, now: Millis);

    /// Silence the siren.  Idempotent.
    fn stop_siren(&mut self);

    /// Per-tick update that alternates the siren tone.
    fn advance(&mut self, now: Millis);

    fn is_siren_active(&self) -> bool;
}

/// Tri-colour status indicator.
pub trait ColorIndicator {
    fn set_colour(&mut self, colour: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Toggle source (driven adapter: remote → domain)
// ───────────────────────────────────────────────────────────────

/// Debounced enable/disable edge, latched until consumed.
pub trait ToggleSource {
    /// Sample the physical inputs and latch any accepted edge.
    fn advance(&mut self, now: Millis);

    /// Read and clear the latch.
    fn check_and_clear(&mut self) -> bool;

    /// Offer a synthetic edge at `now` (console / diagnostics), subject to
    /// the same debounce.  Returns `true` if accepted.
    fn inject(&mut self, now: Millis) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The service emits structured [`DeviceEvent`]s through this port.
/// Purely observational: nothing flows back into the control logic.
pub trait EventSink {
    fn emit(&mut self, event: &DeviceEvent);
}

// ───────────────────────────────────────────────────────────────
// Borrowed-handle forwarding
// ───────────────────────────────────────────────────────────────

impl<T: MotionSensor + ?Sized> MotionSensor for &mut T {
    fn initialize(&mut self, now: Millis) {
        (**self).initialize(now);
    }
    fn advance(&mut self, now: Millis) {
        (**self).advance(now);
    }
    fn is_stabilizing(&self) -> bool {
        (**self).is_stabilizing()
    }
    fn is_motion_detected(&mut self) -> bool {
        (**self).is_motion_detected()
    }
}

impl<T: VariableOutput + ?Sized> VariableOutput for &mut T {
    fn on(&mut self, speed: u16) {
        (**self).on(speed);
    }
    fn off(&mut self) {
        (**self).off();
    }
    fn current_speed(&self) -> u8 {
        (**self).current_speed()
    }
}

impl<T: AudibleSignal + ?Sized> AudibleSignal for &mut T {
    fn start_siren(&mut self, now: Millis) {
        (**self).start_siren(now);
    }
    fn stop_siren(&mut self) {
        (**self).stop_siren();
    }
    fn advance(&mut self, now: Millis) {
        (**self).advance(now);
    }
    fn is_siren_active(&self) -> bool {
        (**self).is_siren_active()
    }
}

impl<T: ColorIndicator + ?Sized> ColorIndicator for &mut T {
    fn set_colour(&mut self, colour: Rgb) {
        (**self).set_colour(colour);
    }
}

impl<T: ToggleSource + ?Sized> ToggleSource for &mut T {
    fn advance(&mut self, now: Millis) {
        (**self).advance(now);
    }
    fn check_and_clear(&mut self) -> bool {
        (**self).check_and_clear()
    }
    fn inject(&mut self, now: Millis) -> bool {
        (**self).inject(now)
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &DeviceEvent) {
        (**self).emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Peripheral bundle
// ───────────────────────────────────────────────────────────────

/// The capability set the state machine drives, one associated type per
/// peripheral.
pub trait PeripheralSet {
    type Motion: MotionSensor;
    type Output: VariableOutput;
    type Signal: AudibleSignal;
    type Indicator: ColorIndicator;
    type Toggle: ToggleSource;

    fn motion(&mut self) -> &mut Self::Motion;
    fn output(&mut self) -> &mut Self::Output;
    fn signal(&mut self) -> &mut Self::Signal;
    fn indicator(&mut self) -> &mut Self::Indicator;
    fn toggle(&mut self) -> &mut Self::Toggle;

    /// Run every peripheral's own per-tick update.  The driver loop calls
    /// this once per cycle, before the state machine ticks.
    fn advance_all(&mut self, now: Millis) {
        self.motion().advance(now);
        self.signal().advance(now);
        self.toggle().advance(now);
    }
}

/// Plain struct bundle of the five peripherals.
///
/// Fields may be owned drivers or `&mut` handles to drivers owned
/// elsewhere.
#[derive(Debug, Default)]
pub struct Peripherals<M, F, S, L, R> {
    pub motion: M,
    pub output: F,
    pub signal: S,
    pub indicator: L,
    pub toggle: R,
}

impl<M, F, S, L, R> Peripherals<M, F, S, L, R> {
    pub fn new(motion: M, output: F, signal: S, indicator: L, toggle: R) -> Self {
        Self {
            motion,
            output,
            signal,
            indicator,
            toggle,
        }
    }
}

impl<M, F, S, L, R> PeripheralSet for Peripherals<M, F, S, L, R>
where
    M: MotionSensor,
    F: VariableOutput,
    S: AudibleSignal,
    L: ColorIndicator,
    R: ToggleSource,
{
    type Motion = M;
    type Output = F;
    type Signal = S;
    type Indicator = L;
    type Toggle = R;

    fn motion(&mut self) -> &mut M {
        &mut self.motion
    }
    fn output(&mut self) -> &mut F {
        &mut self.output
    }
    fn signal(&mut self) -> &mut S {
        &mut self.signal
    }
    fn indicator(&mut self) -> &mut L {
        &mut self.indicator
    }
    fn toggle(&mut self) -> &mut R {
        &mut self.toggle
    }
}
