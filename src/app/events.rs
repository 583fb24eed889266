//! Outbound diagnostic events.
//!
//! The [`DeviceService`](super::service::DeviceService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (serial log today).

use serde::Serialize;

use crate::fsm::DeviceState;
use crate::timing::Millis;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeviceEvent {
    /// The state machine was (re)initialised into its boot state.
    Started { state: DeviceState, at: Millis },

    /// A guarded transition fired during a tick.
    StateChanged {
        from: DeviceState,
        to: DeviceState,
        at: Millis,
    },

    /// An administrative override moved the state without guards.
    StateForced { from: DeviceState, to: DeviceState },

    /// A synthetic remote toggle was offered; `accepted` is false when the
    /// debounce window dropped it.
    ToggleInjected { accepted: bool, at: Millis },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryData {
    pub state: DeviceState,
    pub output_speed: u8,
    pub siren_active: bool,
    pub motion_stabilizing: bool,
    /// Hold time left before Active decays to Standby (Active only).
    pub hold_remaining_ms: Option<Millis>,
    pub ticks: u64,
}

/// One entry of the service's bounded transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub from: DeviceState,
    pub to: DeviceState,
    pub at: Millis,
    pub forced: bool,
}
