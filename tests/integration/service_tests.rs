//! Integration tests for the DeviceService → FSM → peripherals pipeline.

use catscarer::app::commands::DeviceCommand;
use catscarer::app::events::DeviceEvent;
use catscarer::app::service::DeviceService;
use catscarer::config::DeviceConfig;
use catscarer::drivers::status_led::COLOUR_DISABLED;
use catscarer::fsm::DeviceState;

use crate::mock_hw::{CallLog, HwCall, MockIo, RecordingSink, mock_board};

fn make_service() -> (DeviceService<MockIo>, CallLog, RecordingSink) {
    let (io, log) = mock_board();
    let mut svc = DeviceService::new(io, DeviceConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    svc.start(0, &mut sink);
    (svc, log, sink)
}

#[test]
fn start_arms_sensor_warmup() {
    let (svc, _, sink) = make_service();
    assert_eq!(svc.peripherals().motion.initialized_at, Some(0));
    assert_eq!(svc.state(), DeviceState::WarmUp);
    assert_eq!(
        sink.events,
        vec![DeviceEvent::Started {
            state: DeviceState::WarmUp,
            at: 0
        }]
    );
}

#[test]
fn tick_advances_peripherals_before_fsm() {
    let (mut svc, _, mut sink) = make_service();
    svc.tick(50, &mut sink);
    assert_eq!(svc.peripherals().signal.advanced_to, Some(50));
}

#[test]
fn full_cycle_event_trail() {
    let (mut svc, log, mut sink) = make_service();

    svc.peripherals_mut().motion.ready = true;
    svc.tick(45_000, &mut sink);
    svc.peripherals_mut().motion.raw_motion = true;
    svc.tick(46_000, &mut sink);
    svc.peripherals_mut().motion.raw_motion = false;
    svc.tick(50_999, &mut sink);
    svc.tick(51_000, &mut sink);

    assert_eq!(
        sink.state_changes(),
        vec![
            (DeviceState::WarmUp, DeviceState::Standby),
            (DeviceState::Standby, DeviceState::Active),
            (DeviceState::Active, DeviceState::Standby),
        ]
    );
    assert_eq!(
        log.actuator_calls(),
        vec![
            HwCall::FanOn(255),
            HwCall::SirenStart(46_000),
            HwCall::FanOff,
            HwCall::SirenStop
        ]
    );
    let ats: Vec<_> = svc.recent_transitions().map(|r| r.at).collect();
    assert_eq!(ats, vec![45_000, 46_000, 51_000]);
}

#[test]
fn console_toggle_disables_and_reenables() {
    let (mut svc, log, mut sink) = make_service();
    svc.peripherals_mut().motion.ready = true;
    svc.tick(45_000, &mut sink);

    svc.handle_command(DeviceCommand::SimulateToggle, 45_010, &mut sink);
    svc.tick(45_050, &mut sink);
    assert_eq!(svc.state(), DeviceState::Inactive);

    svc.tick(45_100, &mut sink);
    assert_eq!(log.last_colour(), Some(COLOUR_DISABLED));

    // Inside the debounce window: dropped
    svc.handle_command(DeviceCommand::SimulateToggle, 45_100, &mut sink);
    assert_eq!(
        sink.events.last(),
        Some(&DeviceEvent::ToggleInjected {
            accepted: false,
            at: 45_100
        })
    );
    svc.tick(45_150, &mut sink);
    assert_eq!(svc.state(), DeviceState::Inactive);

    svc.handle_command(DeviceCommand::SimulateToggle, 45_300, &mut sink);
    svc.tick(45_350, &mut sink);
    assert_eq!(svc.state(), DeviceState::Standby);
}

#[test]
fn telemetry_reflects_active_outputs() {
    let (io, _) = mock_board();
    let config = DeviceConfig {
        telemetry_interval_cycles: 2,
        ..DeviceConfig::default()
    };
    let mut svc = DeviceService::new(io, config).unwrap();
    let mut sink = RecordingSink::new();
    svc.start(0, &mut sink);

    svc.peripherals_mut().motion.ready = true;
    svc.peripherals_mut().motion.raw_motion = true;
    svc.tick(50, &mut sink); // -> Standby
    svc.tick(100, &mut sink); // -> Active, telemetry

    let Some(DeviceEvent::Telemetry(t)) = sink.events.last() else {
        panic!("expected telemetry, got {:?}", sink.events.last());
    };
    assert_eq!(t.state, DeviceState::Active);
    assert_eq!(t.output_speed, 255);
    assert!(t.siren_active);
    assert!(!t.motion_stabilizing);
    assert_eq!(t.hold_remaining_ms, Some(5_000));
    assert_eq!(t.ticks, 2);
    assert_eq!(sink.telemetry_count(), 1);
}

#[test]
fn forced_states_show_in_history() {
    let (mut svc, _, mut sink) = make_service();
    svc.handle_command(DeviceCommand::ForceState(DeviceState::Active), 10, &mut sink);
    svc.handle_command(DeviceCommand::ForceState(DeviceState::Inactive), 20, &mut sink);

    let forced: Vec<_> = svc
        .recent_transitions()
        .map(|r| (r.from, r.to, r.forced))
        .collect();
    assert_eq!(
        forced,
        vec![
            (DeviceState::WarmUp, DeviceState::Active, true),
            (DeviceState::Active, DeviceState::Inactive, true),
        ]
    );
}

#[test]
fn console_bytes_drive_commands() {
    let (mut svc, _, mut sink) = make_service();
    for &byte in b"3R2" {
        if let Some(cmd) = DeviceCommand::from_console(byte) {
            svc.handle_command(cmd, 0, &mut sink);
        }
    }
    assert_eq!(svc.state(), DeviceState::Active);
    assert_eq!(svc.state_name(), "ACTIVE");
}
