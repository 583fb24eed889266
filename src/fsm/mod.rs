//! Function-pointer finite state machine for the deterrent.
//!
//! Classic embedded FSM pattern:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌──────────┬───────────┬──────────┬─────────────────────┐   │
//! │  │ State    │ on_enter  │ on_exit  │ on_update           │   │
//! │  ├──────────┼───────────┼──────────┼─────────────────────┤   │
//! │  │ WarmUp   │ -         │ -        │ fn(ctx)->Option<>   │   │
//! │  │ Standby  │ -         │ -        │ fn(ctx)->Option<>   │   │
//! │  │ Active   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<>   │   │
//! │  │ Inactive │ -         │ -        │ fn(ctx)->Option<>   │   │
//! │  └──────────┴───────────┴──────────┴─────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the machine calls `on_update` for the **current** state.
//! If it returns `Some(next)`, the machine runs `on_exit` for the current
//! state, then `on_enter` for the next, and updates the current pointer.
//! All handlers receive `&mut FsmContext<P>`, which holds the peripheral
//! handles, config, and timing.

pub mod context;
pub mod states;

use log::info;
use serde::{Deserialize, Serialize};

use crate::app::ports::PeripheralSet;
use crate::config::DeviceConfig;
use crate::error::Result;
use crate::timing::{Millis, elapsed};
use context::{ActivationWindow, FsmContext};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all device states.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DeviceState {
    WarmUp = 0,
    Standby = 1,
    Active = 2,
    Inactive = 3,
}

impl DeviceState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `DeviceState`.  Panics on out-of-range in
    /// debug builds; returns `Inactive` in release (deterrent off).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::WarmUp,
            1 => Self::Standby,
            2 => Self::Active,
            3 => Self::Inactive,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Inactive
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each guarded transition.
pub type StateActionFn<P> = fn(&mut FsmContext<P>);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn<P> = fn(&mut FsmContext<P>) -> Option<DeviceState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor<P> {
    pub id: DeviceState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn<P>>,
    pub on_exit: Option<StateActionFn<P>>,
    pub on_update: StateUpdateFn<P>,
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// The device-level state machine.
///
/// Owns the state table and the [`FsmContext`] (and through it the
/// peripheral handles).  Transitions happen only inside [`tick`]; the
/// only way around the guards is [`force_state`].
///
/// [`tick`]: DeviceStateMachine::tick
/// [`force_state`]: DeviceStateMachine::force_state
pub struct DeviceStateMachine<P: PeripheralSet> {
    table: [StateDescriptor<P>; DeviceState::COUNT],
    ctx: FsmContext<P>,
    /// Index of the current state.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
    /// Timestamp at which the current state was entered.  `None` after
    /// `initialize`/`force_state` until the next tick supplies a time.
    state_entered_at: Option<Millis>,
}

impl<P: PeripheralSet> DeviceStateMachine<P> {
    /// Build the machine over `io`, starting in `WarmUp`.
    ///
    /// Fails if `config` does not validate.
    pub fn new(io: P, config: DeviceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: states::build_state_table(),
            ctx: FsmContext::new(io, config),
            current: DeviceState::WarmUp as usize,
            tick_count: 0,
            state_entry_tick: 0,
            state_entered_at: None,
        })
    }

    /// Reset to `WarmUp` and clear the flicker/activation timers.
    /// Peripherals are left alone; the next tick decides what they see.
    pub fn initialize(&mut self) {
        self.current = DeviceState::WarmUp as usize;
        self.ctx.reset_timers();
        self.mark_entry(None);
        info!("FSM initialized in state: {}", self.state_name());
    }

    /// Advance the machine by one control cycle at time `now`.
    pub fn tick(&mut self, now: Millis) {
        self.tick_count += 1;
        self.ctx.now = now;
        self.ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        self.state_entered_at.get_or_insert(now);

        let next = (self.table[self.current].on_update)(&mut self.ctx);

        if let Some(next_id) = next {
            self.transition(next_id);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> DeviceState {
        self.table[self.current].id
    }

    /// Upper-case display name of the current state.
    pub fn state_name(&self) -> &'static str {
        self.table[self.current].name
    }

    /// Administrative override: jump to `state` without guards or
    /// enter/exit hooks.  No peripheral is touched.  Any activation window
    /// is dropped (a forced Active opens a fresh one on its first tick) and
    /// forcing `WarmUp` re-arms the flicker phase.
    pub fn force_state(&mut self, state: DeviceState) {
        let from = self.state_name();
        self.current = state as usize;
        self.ctx.activation = None;
        if state == DeviceState::WarmUp {
            self.ctx.flicker.reset();
        }
        self.mark_entry(None);
        info!("FSM state forced: {} -> {}", from, self.state_name());
    }

    /// Total ticks processed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// How many ticks the machine has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    /// Milliseconds spent in the current state as of `now`.  A state
    /// entered through `initialize`/`force_state` is timed from the first
    /// tick after it; before that tick this is 0.
    pub fn time_in_state(&self, now: Millis) -> Millis {
        self.state_entered_at.map_or(0, |at| elapsed(now, at))
    }

    /// The live activation window (only while Active).
    pub fn activation_window(&self) -> Option<ActivationWindow> {
        self.ctx.activation
    }

    /// Hold time left in the activation window as of the last tick.
    pub fn activation_remaining(&self) -> Option<Millis> {
        self.ctx.activation.map(|w| w.remaining(self.ctx.now))
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.ctx.config
    }

    pub fn peripherals(&self) -> &P {
        &self.ctx.io
    }

    pub fn peripherals_mut(&mut self) -> &mut P {
        &mut self.ctx.io
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: DeviceState) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(&mut self.ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.mark_entry(Some(self.ctx.now));

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(&mut self.ctx);
        }
    }

    fn mark_entry(&mut self, at: Option<Millis>) {
        self.state_entry_tick = self.tick_count;
        self.state_entered_at = at;
        self.ctx.ticks_in_state = 0;
    }
}

// ---------------------------------------------------------------------------
// Test doubles shared by the unit and property tests below
// ---------------------------------------------------------------------------
