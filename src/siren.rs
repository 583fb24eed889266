//! Two-tone siren oscillator.
//!
//! Pure timing state for the alternating high/low wail the deterrent
//! plays while active.  The buzzer driver owns one of these and calls
//! [`SirenOscillator::advance`] every control tick; whenever the
//! oscillator reports a new tone, the driver retunes the tone generator.
//!
//! ```text
//!  start ─▶ HIGH ──period──▶ LOW ──period──▶ HIGH ──period──▶ …
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::timing::{Millis, has_elapsed};

/// High siren tone frequency (Hz).
pub const HIGH_TONE_HZ: u32 = 800;
/// Low siren tone frequency (Hz).
pub const LOW_TONE_HZ: u32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SirenTone {
    High,
    Low,
}

impl SirenTone {
    pub const fn frequency_hz(self) -> u32 {
        match self {
            Self::High => HIGH_TONE_HZ,
            Self::Low => LOW_TONE_HZ,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::High => Self::Low,
            Self::Low => Self::High,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SirenOscillator {
    active: bool,
    tone: SirenTone,
    last_change: Millis,
    period: Millis,
}

impl SirenOscillator {
    /// A stopped oscillator that alternates every `period` once started.
    pub fn new(period: Millis) -> Result<Self> {
        if period == 0 {
            return Err(Error::Config("siren period must be non-zero"));
        }
        Ok(Self {
            active: false,
            tone: SirenTone::High,
            last_change: 0,
            period,
        })
    }

    /// Begin the wail at `now`, always on the high tone.
    pub fn start(&mut self, now: Millis) -> SirenTone {
        self.active = true;
        self.tone = SirenTone::High;
        self.last_change = now;
        self.tone
    }

    /// Stop the wail.  Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        core::mem::replace(&mut self.active, false)
    }

    /// Advance to `now`.  Returns the new tone if one period has elapsed
    /// since the last change; `None` while stopped or mid-period.
    pub fn advance(&mut self, now: Millis) -> Option<SirenTone> {
        if !self.active || !has_elapsed(now, self.last_change, self.period) {
            return None;
        }
        self.tone = self.tone.flipped();
        self.last_change = now;
        Some(self.tone)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tone(&self) -> SirenTone {
        self.tone
    }

    pub fn period(&self) -> Millis {
        self.period
    }
}
