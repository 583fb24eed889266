//! Remote enable/disable toggle.
//!
//! ## Edge sources
//!
//! | Source                   | Edge condition                        |
//! |--------------------------|---------------------------------------|
//! | IR receiver (decoded)    | code == `remote_power_code`           |
//! | Toggle input pin         | falling edge (active-low, pulled up)  |
//! | Console / diagnostics    | [`IrRemote::simulate_toggle`]         |
//!
//! All three feed one [`ToggleLatch`], so the debounce window applies
//! across sources: an IR repeat frame arriving right after a pin edge is
//! dropped just like a contact bounce.  The latch holds until the state
//! machine consumes it.

use embedded_hal::digital::InputPin;
use log::{debug, info, warn};

use crate::app::ports::ToggleSource;
use crate::drivers::IrDecoder;
use crate::timing::{Millis, ToggleLatch};

pub struct IrRemote<P, D> {
    pin: P,
    decoder: D,
    power_code: u32,
    latch: ToggleLatch,
    /// Last sampled pin level; idle is high.
    last_level: bool,
}

impl<P: InputPin, D: IrDecoder> IrRemote<P, D> {
    pub fn new(pin: P, decoder: D, power_code: u32, debounce_ms: Millis) -> Self {
        Self {
            pin,
            decoder,
            power_code,
            latch: ToggleLatch::new(debounce_ms),
            last_level: true,
        }
    }

    /// Offer a synthetic edge at `now`.  Subject to the same debounce as
    /// real edges; returns `true` if it was latched.
    pub fn simulate_toggle(&mut self, now: Millis) -> bool {
        self.offer(now, "console")
    }

    /// `true` if an accepted edge is waiting to be consumed.
    pub fn is_pending(&self) -> bool {
        self.latch.is_latched()
    }

    fn offer(&mut self, now: Millis, source: &str) -> bool {
        let accepted = self.latch.trigger(now);
        if accepted {
            info!("remote: toggle from {} at {}ms", source, now);
        } else {
            debug!("remote: {} edge at {}ms dropped (debounce)", source, now);
        }
        accepted
    }

    /// `true` on a high-to-low transition of the toggle pin.
    fn sample_falling_edge(&mut self) -> bool {
        let level = match self.pin.is_high() {
            Ok(level) => level,
            Err(_) => {
                warn!("remote: input read failed");
                return false;
            }
        };
        let falling = self.last_level && !level;
        self.last_level = level;
        falling
    }
}

impl<P: InputPin, D: IrDecoder> ToggleSource for IrRemote<P, D> {
    fn advance(&mut self, now: Millis) {
        if self.sample_falling_edge() {
            self.offer(now, "pin");
        }

        while let Some(code) = self.decoder.poll_code() {
            if code == self.power_code {
                self.offer(now, "ir");
            } else {
                debug!("remote: ignoring IR code 0x{:08X}", code);
            }
        }
    }

    fn check_and_clear(&mut self) -> bool {
        self.latch.check_and_clear()
    }

    fn inject(&mut self, now: Millis) -> bool {
        self.simulate_toggle(now)
    }
}
