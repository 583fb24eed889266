//! Peripheral drivers and hardware initialisation.
//!
//! Every driver is generic over the embedded-hal traits (or the two small
//! crate traits below) and implements one of the port traits in
//! [`crate::app::ports`].  HAL errors stop here: they are logged and
//! absorbed, never propagated into the state machine.

pub mod buzzer;
pub mod fan;
pub mod hw_init;
pub mod pir;
pub mod remote;
pub mod status_led;

/// Square-wave tone output driving the piezo.
pub trait ToneGenerator {
    /// Emit a continuous tone at `freq_hz`.
    fn play(&mut self, freq_hz: u32);

    /// Stop any tone and leave the line low.
    fn silence(&mut self);

    /// Hold the line statically high or low (simple on/off mode).
    fn set_level(&mut self, high: bool);
}

/// Source of decoded infrared remote codes.
pub trait IrDecoder {
    /// Return the next decoded code, if one arrived since the last poll.
    fn poll_code(&mut self) -> Option<u32>;
}

/// Decoder for boards that have no IR receiver stack; never yields a code.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDecoder;

impl IrDecoder for NoDecoder {
    fn poll_code(&mut self) -> Option<u32> {
        None
    }
}

impl<T: ToneGenerator + ?Sized> ToneGenerator for &mut T {
    fn play(&mut self, freq_hz: u32) {
        (**self).play(freq_hz);
    }
    fn silence(&mut self) {
        (**self).silence();
    }
    fn set_level(&mut self, high: bool) {
        (**self).set_level(high);
    }
}

impl<T: IrDecoder + ?Sized> IrDecoder for &mut T {
    fn poll_code(&mut self) -> Option<u32> {
        (**self).poll_code()
    }
}
