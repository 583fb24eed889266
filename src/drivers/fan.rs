//! Variable-speed fan driver.
//!
//! A single LEDC PWM channel into a low-side MOSFET.  Speed is an 8-bit
//! value; anything above 255 is clamped.  The driver is a dumb actuator:
//! when it runs is decided by the state machine.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::VariableOutput;

/// Full-scale fan speed.
pub const MAX_SPEED: u8 = u8::MAX;

pub struct PwmFan<C> {
    channel: C,
    speed: u8,
}

impl<C: SetDutyCycle> PwmFan<C> {
    /// Take the PWM channel and make sure the fan is stopped.
    pub fn new(channel: C) -> Self {
        let mut fan = Self { channel, speed: 0 };
        fan.write(0);
        fan
    }

    pub fn is_running(&self) -> bool {
        self.speed > 0
    }

    fn write(&mut self, speed: u8) {
        if self
            .channel
            .set_duty_cycle_fraction(u16::from(speed), u16::from(MAX_SPEED))
            .is_err()
        {
            warn!("fan: duty write failed (speed={})", speed);
        }
        self.speed = speed;
    }
}

impl<C: SetDutyCycle> VariableOutput for PwmFan<C> {
    fn on(&mut self, speed: u16) {
        let speed = speed.min(u16::from(MAX_SPEED)) as u8;
        if speed == 0 {
            self.off();
            return;
        }
        self.write(speed);
    }

    fn off(&mut self) {
        self.write(0);
    }

    fn current_speed(&self) -> u8 {
        self.speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::test_pins::{BrokenPwm, SharedPwm};

    fn fan() -> (PwmFan<SharedPwm>, SharedPwm) {
        let pwm = SharedPwm::default();
        (PwmFan::new(pwm.clone()), pwm)
    }

    #[test]
    fn starts_stopped() {
        let (fan, pwm) = fan();
        assert!(!fan.is_running());
        assert_eq!(pwm.0.get(), 0);
    }

    #[test]
    fn full_speed() {
        let (mut fan, pwm) = fan();
        fan.on(255);
        assert_eq!(fan.current_speed(), 255);
        assert_eq!(pwm.0.get(), 255);
    }

    #[test]
    fn over_range_speed_clamped() {
        let (mut fan, pwm) = fan();
        fan.on(1000);
        assert_eq!(fan.current_speed(), 255);
        assert_eq!(pwm.0.get(), 255);
    }

    #[test]
    fn zero_speed_is_off() {
        let (mut fan, pwm) = fan();
        fan.on(100);
        fan.on(0);
        assert!(!fan.is_running());
        assert_eq!(pwm.0.get(), 0);
    }

    #[test]
    fn off_is_idempotent() {
        let (mut fan, pwm) = fan();
        fan.off();
        fan.off();
        assert_eq!(fan.current_speed(), 0);
        assert_eq!(pwm.0.get(), 0);
    }

    #[test]
    fn write_errors_are_absorbed() {
        let mut fan = PwmFan::new(BrokenPwm);
        fan.on(200);
        assert_eq!(fan.current_speed(), 200);
    }
}
