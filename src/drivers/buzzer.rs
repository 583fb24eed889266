//! Piezo buzzer driver.
//!
//! Two mutually exclusive modes:
//!
//! - **simple**: line held high or low via [`Buzzer::turn_on`] /
//!   [`Buzzer::turn_off`];
//! - **siren**: two-tone wail driven by a [`SirenOscillator`], retuned
//!   from [`AudibleSignal::advance`] every control tick.
//!
//! Entering simple mode always stops the siren first.

use log::{debug, info};

use crate::app::ports::AudibleSignal;
use crate::drivers::ToneGenerator;
use crate::error::Result;
use crate::siren::{SirenOscillator, SirenTone};
use crate::timing::Millis;

pub struct Buzzer<T> {
    tone: T,
    siren: SirenOscillator,
    is_on: bool,
}

impl<T: ToneGenerator> Buzzer<T> {
    /// Wrap `tone`, silenced, with a siren that alternates every
    /// `siren_period_ms`.  Fails on a zero period.
    pub fn new(mut tone: T, siren_period_ms: Millis) -> Result<Self> {
        let siren = SirenOscillator::new(siren_period_ms)?;
        tone.silence();
        Ok(Self {
            tone,
            siren,
            is_on: false,
        })
    }

    /// Hold the buzzer line high (simple mode).
    pub fn turn_on(&mut self) {
        self.stop_siren();
        self.tone.set_level(true);
        self.is_on = true;
    }

    /// Drive the buzzer line low (simple mode).
    pub fn turn_off(&mut self) {
        self.stop_siren();
        self.tone.set_level(false);
        self.is_on = false;
    }

    /// `true` while held on in simple mode.
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Tone the siren is on (meaningful only while it is active).
    pub fn current_tone(&self) -> SirenTone {
        self.siren.tone()
    }
}

impl<T: ToneGenerator> AudibleSignal for Buzzer<T> {
    fn start_siren(&mut self, now: Millis) {
        self.is_on = false;
        let tone = self.siren.start(now);
        self.tone.play(tone.frequency_hz());
        info!("buzzer: siren started");
    }

    fn stop_siren(&mut self) {
        if self.siren.stop() {
            self.tone.silence();
            info!("buzzer: siren stopped");
        }
    }

    fn advance(&mut self, now: Millis) {
        if let Some(tone) = self.siren.advance(now) {
            debug!("buzzer: siren tone {:?}", tone);
            self.tone.play(tone.frequency_hz());
        }
    }

    fn is_siren_active(&self) -> bool {
        self.siren.is_active()
    }
}
