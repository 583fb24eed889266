//! Device configuration parameters
//!
//! Fixed timing and output constants handed to the state machine and the
//! peripheral wrappers at construction.  Nothing is persisted; values are
//! compiled in or supplied by the board bring-up code.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::timing::Millis;

/// Core device configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    // --- Motion sensor ---
    /// PIR settling period after power-up (milliseconds)
    pub warmup_ms: Millis,

    // --- Deterrent ---
    /// Quiet period after the last motion before the deterrent stops (milliseconds)
    pub activation_ms: Millis,
    /// Fan speed while active (0-255; larger values are clamped by the output)
    pub output_speed: u16,
    /// Duration of each siren tone before alternating (milliseconds)
    pub siren_period_ms: Millis,

    // --- Indicator ---
    /// Blue flicker half-period during warm-up (milliseconds)
    pub flicker_ms: Millis,

    // --- Remote ---
    /// Minimum spacing between accepted toggle edges (milliseconds)
    pub debounce_ms: Millis,
    /// The single decoded IR command that toggles the device
    pub remote_power_code: u32,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub control_loop_interval_ms: Millis,
    /// Control cycles between telemetry reports
    pub telemetry_interval_cycles: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            // Motion sensor
            warmup_ms: 45_000,

            // Deterrent
            activation_ms: 5_000,
            output_speed: 255,
            siren_period_ms: 300,

            // Indicator
            flicker_ms: 500,

            // Remote
            debounce_ms: 200,
            remote_power_code: 0x00FF_A25D, // NEC "POWER" on the bundled remote

            // Timing
            control_loop_interval_ms: 50,  // 20 Hz
            telemetry_interval_cycles: 200, // every 10 s at 20 Hz
        }
    }
}

impl DeviceConfig {
    /// Reject values that would make the timing logic meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.activation_ms == 0 {
            return Err(Error::Config("activation_ms must be non-zero"));
        }
        if self.flicker_ms == 0 {
            return Err(Error::Config("flicker_ms must be non-zero"));
        }
        if self.siren_period_ms == 0 {
            return Err(Error::Config("siren_period_ms must be non-zero"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be non-zero"));
        }
        if self.telemetry_interval_cycles == 0 {
            return Err(Error::Config("telemetry_interval_cycles must be non-zero"));
        }
        Ok(())
    }
}
