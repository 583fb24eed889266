//! PIR motion sensor driver.
//!
//! HC-SR501-style module with a digital output (HIGH = motion).  These
//! parts need a settling period after power-up during which the output
//! is meaningless, so every reading is forced to "no motion" until the
//! warm-up has elapsed.
//!
//! `initialize` (re)starts the warm-up.  Completion is otherwise one-way:
//! `advance` never puts a settled sensor back into stabilizing.

use embedded_hal::digital::InputPin;
use log::{info, warn};

use crate::app::ports::MotionSensor;
use crate::timing::{Millis, has_elapsed};

pub struct PirSensor<P> {
    pin: P,
    warmup_ms: Millis,
    warmup_start: Millis,
    settled: bool,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P, warmup_ms: Millis) -> Self {
        Self {
            pin,
            warmup_ms,
            warmup_start: 0,
            settled: false,
        }
    }

    pub fn warmup_ms(&self) -> Millis {
        self.warmup_ms
    }

    /// Raw pin level, ignoring warm-up.  A read error counts as idle.
    fn read_raw(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                warn!("pir: input read failed, treating as no motion");
                false
            }
        }
    }
}

impl<P: InputPin> MotionSensor for PirSensor<P> {
    fn initialize(&mut self, now: Millis) {
        self.warmup_start = now;
        self.settled = false;
        info!("pir: warming up for {}ms", self.warmup_ms);
    }

    fn advance(&mut self, now: Millis) {
        if !self.settled && has_elapsed(now, self.warmup_start, self.warmup_ms) {
            self.settled = true;
            info!("pir: warm-up complete");
        }
    }

    fn is_stabilizing(&self) -> bool {
        !self.settled
    }

    fn is_motion_detected(&mut self) -> bool {
        if !self.settled {
            return false;
        }
        self.read_raw()
    }
}
