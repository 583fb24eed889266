//! One-shot hardware peripheral initialization and raw pin access.
//!
//! Configures GPIO directions and LEDC timers/channels using raw ESP-IDF
//! sys calls.  Called once from `main()` before the control loop starts.
//!
//! On host targets every accessor is backed by process-wide atomics so the
//! adapters in [`crate::adapters::hardware`] can be exercised without a
//! board: tests drive inputs with [`sim_set_gpio`] and observe outputs with
//! [`sim_ledc_duty`] / [`sim_ledc_freq`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

pub const LEDC_TIMER_FAN: u32 = 0;
pub const LEDC_TIMER_LED: u32 = 1;
pub const LEDC_TIMER_BUZZER: u32 = 2;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // PIR drives its output push-pull; the remote line idles high on the pull-up.
    let inputs = [
        (pins::PIR_GPIO, gpio_pullup_t_GPIO_PULLUP_DISABLE),
        (pins::REMOTE_GPIO, gpio_pullup_t_GPIO_PULLUP_ENABLE),
    ];

    for (pin, pull_up) in inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: pull_up,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured (pir={}, remote={})", pins::PIR_GPIO, pins::REMOTE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LED_B_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::LED_B_GPIO, 0) };

    info!("hw_init: GPIO outputs configured (led_b={})", pins::LED_B_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    let timers = [
        (LEDC_TIMER_FAN, pins::FAN_PWM_FREQ_HZ),
        (LEDC_TIMER_LED, pins::LED_PWM_FREQ_HZ),
        (LEDC_TIMER_BUZZER, pins::BUZZER_BASE_FREQ_HZ),
    ];
    for (timer, freq_hz) in timers {
        let cfg = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: timer,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
            freq_hz,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        let ret = unsafe { ledc_timer_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    let channels = [
        (pins::LEDC_CH_FAN, LEDC_TIMER_FAN, pins::FAN_PWM_GPIO),
        (pins::LEDC_CH_BUZZER, LEDC_TIMER_BUZZER, pins::BUZZER_GPIO),
        (pins::LEDC_CH_LED_R, LEDC_TIMER_LED, pins::LED_R_GPIO),
        (pins::LEDC_CH_LED_G, LEDC_TIMER_LED, pins::LED_G_GPIO),
    ];
    for (channel, timer, gpio) in channels {
        let ret = unsafe {
            ledc_channel_config(&ledc_channel_config_t {
                speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
                channel,
                timer_sel: timer,
                gpio_num: gpio,
                duty: 0,
                hpoint: 0,
                ..Default::default()
            })
        };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::LedcInitFailed(ret));
        }
    }

    info!("hw_init: LEDC configured (fan=CH0, buzzer=CH1, led=CH2-3)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, u32::from(duty));
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(target_os = "espidf")]
pub fn ledc_set_freq(timer: u32, freq_hz: u32) {
    // SAFETY: timer configured in init_ledc(); main-loop only.
    let ret = unsafe { esp_idf_svc::sys::ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, timer, freq_hz) };
    if ret != ESP_OK as i32 {
        log::warn!("hw_init: ledc_set_freq({}, {}) failed (rc={})", timer, freq_hz, ret);
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU8, AtomicU32, AtomicU64, Ordering};

    pub const LEDC_CHANNELS: usize = 4;
    pub const LEDC_TIMERS: usize = 3;

    /// Bit n = level of GPIO n.  Pulled-up inputs idle high.
    static GPIO_LEVELS: AtomicU64 = AtomicU64::new(1 << crate::pins::REMOTE_GPIO);
    static LEDC_DUTY: [AtomicU8; LEDC_CHANNELS] = [const { AtomicU8::new(0) }; LEDC_CHANNELS];
    static LEDC_FREQ: [AtomicU32; LEDC_TIMERS] = [const { AtomicU32::new(0) }; LEDC_TIMERS];

    pub fn set_gpio(pin: i32, high: bool) {
        let bit = 1u64 << pin;
        if high {
            GPIO_LEVELS.fetch_or(bit, Ordering::Relaxed);
        } else {
            GPIO_LEVELS.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub fn gpio(pin: i32) -> bool {
        GPIO_LEVELS.load(Ordering::Relaxed) & (1u64 << pin) != 0
    }

    pub fn set_duty(channel: u32, duty: u8) {
        if let Some(slot) = LEDC_DUTY.get(channel as usize) {
            slot.store(duty, Ordering::Relaxed);
        }
    }

    pub fn duty(channel: u32) -> u8 {
        LEDC_DUTY
            .get(channel as usize)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }

    pub fn set_freq(timer: u32, freq_hz: u32) {
        if let Some(slot) = LEDC_FREQ.get(timer as usize) {
            slot.store(freq_hz, Ordering::Relaxed);
        }
    }

    pub fn freq(timer: u32) -> u32 {
        LEDC_FREQ
            .get(timer as usize)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(pin: i32) -> bool {
    sim::gpio(pin)
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) {
    sim::set_gpio(pin, high);
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(channel: u32, duty: u8) {
    sim::set_duty(channel, duty);
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_freq(timer: u32, freq_hz: u32) {
    sim::set_freq(timer, freq_hz);
}

/// Drive a simulated input level (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gpio(pin: i32, high: bool) {
    sim::set_gpio(pin, high);
}

/// Last duty written to a simulated LEDC channel (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_duty(channel: u32) -> u8 {
    sim::duty(channel)
}

/// Last frequency written to a simulated LEDC timer (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_ledc_freq(timer: u32) -> u32 {
    sim::freq(timer)
}
