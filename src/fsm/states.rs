//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers, monomorphised per
//! peripheral set.  No closures, no dynamic dispatch, no heap.
//!
//! ```text
//!  WARMUP ──[sensor settled]──▶ STANDBY ──[motion]──▶ ACTIVE
//!                                  ▲                    │
//!                                  └──[quiet for hold]──┘
//!
//!  WARMUP / STANDBY / ACTIVE ──[toggle]──▶ INACTIVE ──[toggle]──▶ STANDBY
//! ```
//!
//! The remote toggle is checked first in every state and consumed once,
//! so one press moves the device exactly one transition.

use log::info;

use super::context::{ActivationWindow, FsmContext};
use super::{DeviceState, StateDescriptor};
use crate::app::ports::{
    AudibleSignal, ColorIndicator, MotionSensor, PeripheralSet, VariableOutput,
};
use crate::drivers::status_led::{
    COLOUR_ACTIVE, COLOUR_DISABLED, COLOUR_OFF, COLOUR_STANDBY, COLOUR_WARMING,
};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the state table.  Called once at construction.
pub fn build_state_table<P: PeripheralSet>() -> [StateDescriptor<P>; DeviceState::COUNT] {
    [
        // Index 0: WarmUp
        StateDescriptor {
            id: DeviceState::WarmUp,
            name: "WARMUP",
            on_enter: None,
            on_exit: None,
            on_update: warmup_update::<P>,
        },
        // Index 1: Standby
        StateDescriptor {
            id: DeviceState::Standby,
            name: "STANDBY",
            on_enter: None,
            on_exit: None,
            on_update: standby_update::<P>,
        },
        // Index 2: Active
        StateDescriptor {
            id: DeviceState::Active,
            name: "ACTIVE",
            on_enter: Some(active_enter::<P>),
            on_exit: Some(active_exit::<P>),
            on_update: active_update::<P>,
        },
        // Index 3: Inactive
        StateDescriptor {
            id: DeviceState::Inactive,
            name: "INACTIVE",
            on_enter: None,
            on_exit: None,
            on_update: inactive_update::<P>,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  WARMUP state: PIR settling, readings discarded
// ═══════════════════════════════════════════════════════════════════════════

fn warmup_update<P: PeripheralSet>(ctx: &mut FsmContext<P>) -> Option<DeviceState> {
    if ctx.take_toggle() {
        info!("WARMUP: remote toggle, entering inactive mode");
        return Some(DeviceState::Inactive);
    }

    if !ctx.io.motion().is_stabilizing() {
        info!("WARMUP: sensor settled, entering standby");
        return Some(DeviceState::Standby);
    }

    // Blue/off flicker while we wait
    if let Some(on) = ctx.flicker.poll(ctx.now, ctx.config.flicker_ms) {
        let colour = if on { COLOUR_WARMING } else { COLOUR_OFF };
        ctx.io.indicator().set_colour(colour);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  STANDBY state: armed, watching for motion
// ═══════════════════════════════════════════════════════════════════════════

fn standby_update<P: PeripheralSet>(ctx: &mut FsmContext<P>) -> Option<DeviceState> {
    if ctx.take_toggle() {
        info!("STANDBY: remote toggle, entering inactive mode");
        return Some(DeviceState::Inactive);
    }

    if ctx.io.motion().is_motion_detected() {
        info!("STANDBY: motion detected, activating deterrent");
        return Some(DeviceState::Active);
    }

    ctx.io.indicator().set_colour(COLOUR_STANDBY);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE state: fan running, siren wailing
// ═══════════════════════════════════════════════════════════════════════════

fn active_enter<P: PeripheralSet>(ctx: &mut FsmContext<P>) {
    let now = ctx.now;
    let speed = ctx.config.output_speed;

    ctx.io.indicator().set_colour(COLOUR_ACTIVE);
    ctx.io.output().on(speed);
    ctx.io.signal().start_siren(now);
    ctx.activation = Some(ActivationWindow::open(now, ctx.config.activation_ms));

    info!(
        "ACTIVE: fan at {}, siren on, holding {}ms",
        ctx.io.output().current_speed(),
        ctx.config.activation_ms
    );
}

fn active_exit<P: PeripheralSet>(ctx: &mut FsmContext<P>) {
    // Hard cut on every way out of Active
    ctx.io.output().off();
    ctx.io.signal().stop_siren();
    ctx.activation = None;
    info!("ACTIVE: deterrent stopped");
}

fn active_update<P: PeripheralSet>(ctx: &mut FsmContext<P>) -> Option<DeviceState> {
    if ctx.take_toggle() {
        info!("ACTIVE: remote toggle, entering inactive mode");
        return Some(DeviceState::Inactive);
    }

    let now = ctx.now;
    let motion = ctx.io.motion().is_motion_detected();

    let duration = ctx.config.activation_ms;
    let window = ctx
        .activation
        .get_or_insert_with(|| ActivationWindow::open(now, duration));

    if motion {
        window.refresh(now);
    }

    if window.is_expired(now) {
        info!("ACTIVE: no motion for {}ms, returning to standby", duration);
        ctx.io.indicator().set_colour(COLOUR_STANDBY);
        return Some(DeviceState::Standby);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  INACTIVE state: disabled by remote, motion ignored
// ═══════════════════════════════════════════════════════════════════════════

fn inactive_update<P: PeripheralSet>(ctx: &mut FsmContext<P>) -> Option<DeviceState> {
    if ctx.take_toggle() {
        info!("INACTIVE: remote toggle, entering standby");
        return Some(DeviceState::Standby);
    }

    // The motion sensor is deliberately never read here.
    ctx.io.indicator().set_colour(COLOUR_DISABLED);
    None
}
