//! GPIO / LEDC assignments for the CatScarer board (ESP32-S3).
//!
//! Single source of truth: every adapter references this module rather
//! than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// PIR module output.  HIGH = motion.
pub const PIR_GPIO: i32 = 4;

/// IR receiver data line, doubling as the manual toggle button.
/// Active-low with internal pull-up.
pub const REMOTE_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Fan (logic-level MOSFET, low side)
// ---------------------------------------------------------------------------

pub const FAN_PWM_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Piezo buzzer (passive, driven by LEDC square wave)
// ---------------------------------------------------------------------------

pub const BUZZER_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Status LED (discrete RGB, common cathode)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: i32 = 11;
pub const LED_G_GPIO: i32 = 12;
/// Blue is wired to a plain GPIO: on/off only.
pub const LED_B_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// LEDC channels
// ---------------------------------------------------------------------------

pub const LEDC_CH_FAN: u32 = 0;
pub const LEDC_CH_BUZZER: u32 = 1;
pub const LEDC_CH_LED_R: u32 = 2;
pub const LEDC_CH_LED_G: u32 = 3;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Full-scale duty at [`PWM_RESOLUTION_BITS`].
pub const PWM_MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;
/// Fan PWM frequency (25 kHz, above hearing).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// RGB LED PWM frequency.
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
/// Initial buzzer timer frequency; retuned per siren tone.
pub const BUZZER_BASE_FREQ_HZ: u32 = 800;
/// Buzzer duty while sounding (50 % square wave).
pub const BUZZER_TONE_DUTY: u8 = 128;
