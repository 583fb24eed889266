//! Application service: the hexagonal core.
//!
//! [`DeviceService`] owns the state machine (and through it the
//! peripherals).  The board's control loop calls [`DeviceService::tick`]
//! once per cycle; everything observable leaves through the
//! [`EventSink`] injected at the call site.
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  Clock ───────▶ │         DeviceService        │ ──▶ EventSink
//!  DeviceCommand ▶│  advance peripherals · FSM   │
//!                 └──────────────┬───────────────┘
//!                                ▼
//!                   PIR · fan · buzzer · LED · remote
//! ```
//!
//! Order within a cycle: every peripheral's own `advance` runs first
//! (PIR warm-up, siren retune, remote sampling), then the state machine
//! ticks, so a state handler always sees this cycle's inputs.

use heapless::HistoryBuffer;
use log::info;

use crate::config::DeviceConfig;
use crate::error::Result;
use crate::fsm::{DeviceState, DeviceStateMachine};
use crate::timing::{Clock, Millis};

use super::commands::DeviceCommand;
use super::events::{DeviceEvent, TelemetryData, TransitionRecord};
use super::ports::{
    AudibleSignal, EventSink, MotionSensor, PeripheralSet, ToggleSource, VariableOutput,
};

/// Number of transitions kept for diagnostics.
pub const HISTORY_DEPTH: usize = 16;

// ───────────────────────────────────────────────────────────────
// DeviceService
// ───────────────────────────────────────────────────────────────

pub struct DeviceService<P: PeripheralSet> {
    fsm: DeviceStateMachine<P>,
    history: HistoryBuffer<TransitionRecord, HISTORY_DEPTH>,
    /// Control cycles run since construction.
    cycles: u64,
    telemetry_every: u64,
}

impl<P: PeripheralSet> DeviceService<P> {
    /// Construct the service over `io`.
    ///
    /// Does **not** start anything; call [`start`](Self::start) next.
    pub fn new(io: P, config: DeviceConfig) -> Result<Self> {
        let telemetry_every = u64::from(config.telemetry_interval_cycles);
        let fsm = DeviceStateMachine::new(io, config)?;
        Ok(Self {
            fsm,
            history: HistoryBuffer::new(),
            cycles: 0,
            telemetry_every,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Arm the PIR warm-up timer at `now` and put the machine in WarmUp.
    pub fn start(&mut self, now: Millis, sink: &mut impl EventSink) {
        self.fsm.peripherals_mut().motion().initialize(now);
        self.fsm.initialize();
        sink.emit(&DeviceEvent::Started {
            state: self.fsm.current_state(),
            at: now,
        });
        info!("DeviceService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle at `now`.
    pub fn tick(&mut self, now: Millis, sink: &mut impl EventSink) {
        self.cycles += 1;
        let prev = self.fsm.current_state();

        // 1. Peripheral housekeeping
        self.fsm.peripherals_mut().advance_all(now);

        // 2. State logic
        self.fsm.tick(now);

        // 3. Report
        let next = self.fsm.current_state();
        if next != prev {
            self.record(prev, next, now, false);
            sink.emit(&DeviceEvent::StateChanged {
                from: prev,
                to: next,
                at: now,
            });
        }

        if self.cycles % self.telemetry_every == 0 {
            let telemetry = self.build_telemetry();
            sink.emit(&DeviceEvent::Telemetry(telemetry));
        }
    }

    /// Read `clock` and run one cycle.  Returns the timestamp used.
    pub fn run_cycle(&mut self, clock: &impl Clock, sink: &mut impl EventSink) -> Millis {
        let now = clock.now_ms();
        self.tick(now, sink);
        now
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an administrative command (serial console, test harness).
    pub fn handle_command(&mut self, cmd: DeviceCommand, now: Millis, sink: &mut impl EventSink) {
        match cmd {
            DeviceCommand::ForceState(target) => {
                let from = self.fsm.current_state();
                if target != DeviceState::Active {
                    self.silence_deterrent();
                }
                self.fsm.force_state(target);
                self.record(from, target, now, true);
                sink.emit(&DeviceEvent::StateForced { from, to: target });
            }
            DeviceCommand::Reinitialize => {
                self.silence_deterrent();
                self.fsm.initialize();
                sink.emit(&DeviceEvent::Started {
                    state: self.fsm.current_state(),
                    at: now,
                });
            }
            DeviceCommand::SimulateToggle => {
                let accepted = self.fsm.peripherals_mut().toggle().inject(now);
                sink.emit(&DeviceEvent::ToggleInjected { accepted, at: now });
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Snapshot of the device for the telemetry log.
    pub fn build_telemetry(&mut self) -> TelemetryData {
        let state = self.fsm.current_state();
        let ticks = self.fsm.tick_count();
        let hold_remaining_ms = self.fsm.activation_remaining();
        let io = self.fsm.peripherals_mut();
        TelemetryData {
            state,
            output_speed: io.output().current_speed(),
            siren_active: io.signal().is_siren_active(),
            motion_stabilizing: io.motion().is_stabilizing(),
            hold_remaining_ms,
            ticks,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> DeviceState {
        self.fsm.current_state()
    }

    /// Upper-case name of the current state.
    pub fn state_name(&self) -> &'static str {
        self.fsm.state_name()
    }

    /// Control cycles run since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }

    /// Transitions (guarded and forced), oldest first, at most
    /// [`HISTORY_DEPTH`] of them.
    pub fn recent_transitions(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.history.oldest_ordered()
    }

    /// The most recent transition, if any.
    pub fn last_transition(&self) -> Option<&TransitionRecord> {
        self.history.recent()
    }

    pub fn config(&self) -> &DeviceConfig {
        self.fsm.config()
    }

    pub fn state_machine(&self) -> &DeviceStateMachine<P> {
        &self.fsm
    }

    pub fn peripherals(&self) -> &P {
        self.fsm.peripherals()
    }

    pub fn peripherals_mut(&mut self) -> &mut P {
        self.fsm.peripherals_mut()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Stop the fan and siren when an administrative command takes the
    /// machine out of Active.  The machine itself never touches them on
    /// a forced exit.
    fn silence_deterrent(&mut self) {
        if self.fsm.current_state() != DeviceState::Active {
            return;
        }
        let io = self.fsm.peripherals_mut();
        io.output().off();
        io.signal().stop_siren();
        info!("DeviceService: deterrent stopped by command");
    }

    fn record(&mut self, from: DeviceState, to: DeviceState, at: Millis, forced: bool) {
        self.history.write(TransitionRecord {
            from,
            to,
            at,
            forced,
        });
    }
}
