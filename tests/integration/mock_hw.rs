//! Mock peripherals for integration tests.
//!
//! Every actuator call lands in one shared, ordered [`CallLog`] so tests
//! can assert on the full command history (and its ordering across
//! peripherals) without touching GPIO/PWM.

use std::cell::RefCell;
use std::rc::Rc;

use catscarer::app::events::DeviceEvent;
use catscarer::app::ports::{
    AudibleSignal, ColorIndicator, EventSink, MotionSensor, Peripherals, ToggleSource,
    VariableOutput,
};
use catscarer::drivers::status_led::Rgb;
use catscarer::timing::Millis;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    FanOn(u8),
    FanOff,
    SirenStart(Millis),
    SirenStop,
    Colour(Rgb),
}

#[derive(Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<HwCall>>>);

#[allow(dead_code)]
impl CallLog {
    fn push(&self, call: HwCall) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<HwCall> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn last_colour(&self) -> Option<Rgb> {
        self.0.borrow().iter().rev().find_map(|c| match c {
            HwCall::Colour(rgb) => Some(*rgb),
            _ => None,
        })
    }

    /// Calls other than indicator writes.
    pub fn actuator_calls(&self) -> Vec<HwCall> {
        self.0
            .borrow()
            .iter()
            .copied()
            .filter(|c| !matches!(c, HwCall::Colour(_)))
            .collect()
    }
}

// ── Motion sensor ─────────────────────────────────────────────

/// PIR double: the test decides when warm-up is over and what the raw
/// line reads.  Motion is still masked while stabilizing.
#[derive(Default)]
pub struct MockPir {
    pub ready: bool,
    pub raw_motion: bool,
    pub initialized_at: Option<Millis>,
    pub reads: u32,
}

impl MotionSensor for MockPir {
    fn initialize(&mut self, now: Millis) {
        self.initialized_at = Some(now);
    }
    fn advance(&mut self, _now: Millis) {}
    fn is_stabilizing(&self) -> bool {
        !self.ready
    }
    fn is_motion_detected(&mut self) -> bool {
        self.reads += 1;
        self.ready && self.raw_motion
    }
}

// ── Actuators ─────────────────────────────────────────────────

pub struct MockFan {
    log: CallLog,
    speed: u8,
}

impl VariableOutput for MockFan {
    fn on(&mut self, speed: u16) {
        self.speed = speed.min(255) as u8;
        self.log.push(HwCall::FanOn(self.speed));
    }
    fn off(&mut self) {
        self.speed = 0;
        self.log.push(HwCall::FanOff);
    }
    fn current_speed(&self) -> u8 {
        self.speed
    }
}

pub struct MockSiren {
    log: CallLog,
    active: bool,
    pub advanced_to: Option<Millis>,
}

impl AudibleSignal for MockSiren {
    fn start_siren(&mut self, now: Millis) {
        self.active = true;
        self.log.push(HwCall::SirenStart(now));
    }
    fn stop_siren(&mut self) {
        self.active = false;
        self.log.push(HwCall::SirenStop);
    }
    fn advance(&mut self, now: Millis) {
        self.advanced_to = Some(now);
    }
    fn is_siren_active(&self) -> bool {
        self.active
    }
}

pub struct MockLed {
    log: CallLog,
}

impl ColorIndicator for MockLed {
    fn set_colour(&mut self, colour: Rgb) {
        self.log.push(HwCall::Colour(colour));
    }
}

// ── Toggle source ─────────────────────────────────────────────

/// Remote double with a real debounce window.
pub struct MockRemote {
    window: Millis,
    last_accepted: Option<Millis>,
    latched: bool,
}

#[allow(dead_code)]
impl MockRemote {
    /// Latch a press unconditionally (bypasses debounce).
    pub fn press(&mut self) {
        self.latched = true;
    }
}

impl ToggleSource for MockRemote {
    fn advance(&mut self, _now: Millis) {}
    fn check_and_clear(&mut self) -> bool {
        std::mem::take(&mut self.latched)
    }
    fn inject(&mut self, now: Millis) -> bool {
        let accepted = self
            .last_accepted
            .is_none_or(|last| now.wrapping_sub(last) >= self.window);
        if accepted {
            self.last_accepted = Some(now);
            self.latched = true;
        }
        accepted
    }
}

// ── Board bundle ──────────────────────────────────────────────

pub type MockIo = Peripherals<MockPir, MockFan, MockSiren, MockLed, MockRemote>;

pub fn mock_board() -> (MockIo, CallLog) {
    let log = CallLog::default();
    let io = Peripherals::new(
        MockPir::default(),
        MockFan {
            log: log.clone(),
            speed: 0,
        },
        MockSiren {
            log: log.clone(),
            active: false,
            advanced_to: None,
        },
        MockLed { log: log.clone() },
        MockRemote {
            window: 200,
            last_accepted: None,
            latched: false,
        },
    );
    (io, log)
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<DeviceEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_changes(&self) -> Vec<(catscarer::fsm::DeviceState, catscarer::fsm::DeviceState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DeviceEvent::StateChanged { from, to, .. } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, DeviceEvent::Telemetry(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &DeviceEvent) {
        self.events.push(event.clone());
    }
}
