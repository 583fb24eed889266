//! End-to-end behaviour scenarios for the state machine over mock
//! peripherals, at the default timing (45 s warm-up, 5 s hold, 300 ms
//! siren period, 200 ms debounce).

use catscarer::app::ports::ToggleSource;
use catscarer::config::DeviceConfig;
use catscarer::drivers::status_led::{COLOUR_ACTIVE, COLOUR_DISABLED, COLOUR_STANDBY};
use catscarer::fsm::{DeviceState, DeviceStateMachine};

use crate::mock_hw::{CallLog, HwCall, MockIo, mock_board};

fn make_fsm() -> (DeviceStateMachine<MockIo>, CallLog) {
    let (io, log) = mock_board();
    let mut fsm = DeviceStateMachine::new(io, DeviceConfig::default()).unwrap();
    fsm.initialize();
    (fsm, log)
}

fn armed_fsm() -> (DeviceStateMachine<MockIo>, CallLog) {
    let (mut fsm, log) = make_fsm();
    fsm.peripherals_mut().motion.ready = true;
    fsm.tick(0);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
    log.clear();
    (fsm, log)
}

// ── Boot: warm-up to standby ──────────────────────────────────

#[test]
fn warmup_completes_into_standby() {
    let (mut fsm, _) = make_fsm();
    assert_eq!(fsm.current_state(), DeviceState::WarmUp);

    fsm.tick(44_999);
    assert_eq!(fsm.current_state(), DeviceState::WarmUp);

    fsm.peripherals_mut().motion.ready = true;
    fsm.tick(45_000);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
}

#[test]
fn warmup_exit_tick_issues_no_flicker_write() {
    let (mut fsm, log) = make_fsm();
    fsm.peripherals_mut().motion.ready = true;
    fsm.tick(45_000);
    assert!(log.calls().is_empty());
}

// ── Motion activates the deterrent ────────────────────────────

#[test]
fn motion_in_standby_activates_everything() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(46_000);

    assert_eq!(fsm.current_state(), DeviceState::Active);
    assert_eq!(
        log.calls(),
        vec![
            HwCall::Colour(COLOUR_ACTIVE),
            HwCall::FanOn(255),
            HwCall::SirenStart(46_000),
        ]
    );
}

#[test]
fn configured_output_speed_is_used() {
    let (io, log) = mock_board();
    let config = DeviceConfig {
        output_speed: 180,
        ..DeviceConfig::default()
    };
    let mut fsm = DeviceStateMachine::new(io, config).unwrap();
    fsm.initialize();
    fsm.peripherals_mut().motion.ready = true;
    fsm.tick(0);
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(50);
    assert!(log.calls().contains(&HwCall::FanOn(180)));
}

// ── Activation window ─────────────────────────────────────────

#[test]
fn activation_window_refreshes_then_expires() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(1000);
    assert_eq!(fsm.current_state(), DeviceState::Active);

    fsm.tick(3000);
    assert_eq!(fsm.current_state(), DeviceState::Active);

    fsm.peripherals_mut().motion.raw_motion = false;
    fsm.tick(7999);
    assert_eq!(fsm.current_state(), DeviceState::Active);

    log.clear();
    fsm.tick(8000);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
    assert_eq!(
        log.calls(),
        vec![
            HwCall::Colour(COLOUR_STANDBY),
            HwCall::FanOff,
            HwCall::SirenStop
        ]
    );
}

#[test]
fn continuous_motion_keeps_deterrent_on() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().motion.raw_motion = true;
    for t in (0..60_000).step_by(50) {
        fsm.tick(t);
        assert_eq!(fsm.current_state(), DeviceState::Active);
    }
    assert_eq!(log.actuator_calls().len(), 2, "only the initial fan/siren start");
}

// ── Remote toggle ─────────────────────────────────────────────

#[test]
fn toggle_in_active_cuts_actuators() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(100);
    log.clear();

    fsm.peripherals_mut().toggle.press();
    fsm.tick(150);
    assert_eq!(fsm.current_state(), DeviceState::Inactive);
    assert_eq!(log.calls(), vec![HwCall::FanOff, HwCall::SirenStop]);
}

#[test]
fn inactive_ignores_motion_entirely() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().toggle.press();
    fsm.tick(10);
    assert_eq!(fsm.current_state(), DeviceState::Inactive);

    fsm.peripherals_mut().motion.raw_motion = true;
    let reads = fsm.peripherals().motion.reads;
    for t in (50..20_000).step_by(50) {
        fsm.tick(t);
    }
    assert_eq!(fsm.current_state(), DeviceState::Inactive);
    assert!(log.actuator_calls().is_empty());
    assert_eq!(log.last_colour(), Some(COLOUR_DISABLED));
    assert_eq!(fsm.peripherals().motion.reads, reads);
}

#[test]
fn second_toggle_rearms_into_standby() {
    let (mut fsm, _) = armed_fsm();
    fsm.peripherals_mut().toggle.press();
    fsm.tick(10);
    fsm.peripherals_mut().toggle.press();
    fsm.tick(20);
    assert_eq!(fsm.current_state(), DeviceState::Standby);

    // Armed again: motion now activates
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(30);
    assert_eq!(fsm.current_state(), DeviceState::Active);
}

#[test]
fn toggle_during_warmup_disables() {
    let (mut fsm, _) = make_fsm();
    fsm.peripherals_mut().toggle.press();
    fsm.tick(1000);
    assert_eq!(fsm.current_state(), DeviceState::Inactive);

    // Re-enabling skips warm-up; a still-warming sensor just reports no motion
    fsm.peripherals_mut().toggle.press();
    fsm.tick(1100);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(1150);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
}

#[test]
fn remote_debounce_sequence() {
    let (io, _) = mock_board();
    let mut remote = io.toggle;
    assert!(remote.inject(0));
    assert!(!remote.inject(100));
    assert!(remote.check_and_clear());
    assert!(!remote.check_and_clear());
    assert!(remote.inject(250));
    assert!(remote.check_and_clear());
    assert!(remote.inject(500));
    assert!(remote.check_and_clear());
}

// ── Administrative override ───────────────────────────────────

#[test]
fn forced_inactive_then_toggle_goes_standby() {
    let (mut fsm, log) = armed_fsm();
    fsm.force_state(DeviceState::Inactive);
    assert!(log.calls().is_empty());
    fsm.peripherals_mut().toggle.press();
    fsm.tick(100);
    assert_eq!(fsm.current_state(), DeviceState::Standby);
}

#[test]
fn forced_out_of_active_leaves_actuators_as_they_were() {
    let (mut fsm, log) = armed_fsm();
    fsm.peripherals_mut().motion.raw_motion = true;
    fsm.tick(100);
    log.clear();
    fsm.force_state(DeviceState::Standby);
    assert!(log.calls().is_empty());
    assert!(fsm.activation_window().is_none());
}
