//! RGB status LED driver.
//!
//! Red and green sit on LEDC PWM channels; blue is on a plain GPIO, so it
//! is either fully on or off.
//!
//! | Colour            | Meaning                    |
//! |-------------------|----------------------------|
//! | blue / off blink  | PIR warming up             |
//! | green             | armed, watching for motion |
//! | red               | deterrent running          |
//! | yellow            | disabled by remote         |

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::ColorIndicator;

/// `(red, green, blue)`, each 0–255.
pub type Rgb = (u8, u8, u8);

pub const COLOUR_WARMING: Rgb = (0, 0, 255);
pub const COLOUR_STANDBY: Rgb = (0, 255, 0);
pub const COLOUR_ACTIVE: Rgb = (255, 0, 0);
pub const COLOUR_DISABLED: Rgb = (255, 255, 0);
pub const COLOUR_OFF: Rgb = (0, 0, 0);

pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    current: Rgb,
}

impl<R, G, B> RgbLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: OutputPin,
{
    /// Take the three channels and switch the LED off.
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            current: COLOUR_OFF,
        };
        led.write(COLOUR_OFF);
        led
    }

    pub fn off(&mut self) {
        self.write(COLOUR_OFF);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }

    fn write(&mut self, (r, g, b): Rgb) {
        if self.red.set_duty_cycle_fraction(u16::from(r), 255).is_err() {
            warn!("status_led: red duty write failed");
        }
        if self.green.set_duty_cycle_fraction(u16::from(g), 255).is_err() {
            warn!("status_led: green duty write failed");
        }
        let blue = if b > 0 {
            self.blue.set_high()
        } else {
            self.blue.set_low()
        };
        if blue.is_err() {
            warn!("status_led: blue write failed");
        }
        self.current = (r, g, b);
    }
}

impl<R, G, B> ColorIndicator for RgbLed<R, G, B>
where
    R: SetDutyCycle,
    G: SetDutyCycle,
    B: OutputPin,
{
    fn set_colour(&mut self, colour: Rgb) {
        self.write(colour);
    }
}
