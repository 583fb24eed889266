//! Hardware adapter: embedded-hal pin types over the raw `hw_init` access.
//!
//! The drivers are generic over embedded-hal traits; these are the
//! concrete types the board binary plugs in.  This is the only module
//! besides `hw_init` that touches actual hardware.  On non-espidf targets
//! the calls land in the `hw_init` simulation stubs.
//!
//! | Type         | Implements                   | Backed by              |
//! |--------------|------------------------------|------------------------|
//! | `GpioInput`  | `digital::InputPin`          | `gpio_read`            |
//! | `GpioOutput` | `digital::OutputPin`         | `gpio_write`           |
//! | `LedcPwm`    | `pwm::SetDutyCycle` (8-bit)  | `ledc_set`             |
//! | `LedcTone`   | [`ToneGenerator`]            | `ledc_set` + `_freq`   |

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as DigitalErrorType, InputPin, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};

use crate::drivers::ToneGenerator;
use crate::drivers::hw_init;
use crate::pins;

// ── Digital input ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct GpioInput {
    gpio: i32,
}

impl GpioInput {
    /// Pin must already be configured as an input by `hw_init`.
    pub const fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }
}

impl DigitalErrorType for GpioInput {
    type Error = Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(hw_init::gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!hw_init::gpio_read(self.gpio))
    }
}

// ── Digital output ────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct GpioOutput {
    gpio: i32,
}

impl GpioOutput {
    /// Pin must already be configured as an output by `hw_init`.
    pub const fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl DigitalErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}

// ── PWM channel ───────────────────────────────────────────────

/// One 8-bit LEDC channel.
#[derive(Debug, Clone, Copy)]
pub struct LedcPwm {
    channel: u32,
}

impl LedcPwm {
    pub const fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl PwmErrorType for LedcPwm {
    type Error = Infallible;
}

impl SetDutyCycle for LedcPwm {
    fn max_duty_cycle(&self) -> u16 {
        pins::PWM_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        let duty = duty.min(pins::PWM_MAX_DUTY) as u8;
        hw_init::ledc_set(self.channel, duty);
        Ok(())
    }
}

// ── Tone generator ────────────────────────────────────────────

/// Square-wave tone on a dedicated LEDC channel/timer pair.
#[derive(Debug, Clone, Copy)]
pub struct LedcTone {
    channel: u32,
    timer: u32,
}

impl LedcTone {
    pub const fn new(channel: u32, timer: u32) -> Self {
        Self { channel, timer }
    }

    /// The board's buzzer channel.
    pub const fn buzzer() -> Self {
        Self::new(pins::LEDC_CH_BUZZER, hw_init::LEDC_TIMER_BUZZER)
    }
}

impl ToneGenerator for LedcTone {
    fn play(&mut self, freq_hz: u32) {
        hw_init::ledc_set_freq(self.timer, freq_hz);
        hw_init::ledc_set(self.channel, pins::BUZZER_TONE_DUTY);
    }

    fn silence(&mut self) {
        hw_init::ledc_set(self.channel, 0);
    }

    fn set_level(&mut self, high: bool) {
        let duty = if high { pins::PWM_MAX_DUTY as u8 } else { 0 };
        hw_init::ledc_set(self.channel, duty);
    }
}
