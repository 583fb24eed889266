//! CatScarer Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  GpioInput/Output  LedcPwm  LedcTone  LogEventSink SystemClock │
//! │                                                                │
//! │  ──────────────── embedded-hal / port traits ─────────────     │
//! │                                                                │
//! │  PirSensor · PwmFan · Buzzer · RgbLed · IrRemote               │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │          DeviceService (pure logic, one FSM)           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Single cooperative control loop at `control_loop_interval_ms`.  A
//! small console thread forwards serial bytes (`P`, `R`, `0`–`3`) as
//! diagnostic commands.
#![deny(unused_must_use)]

use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use catscarer::adapters::hardware::{GpioInput, GpioOutput, LedcPwm, LedcTone};
use catscarer::adapters::log_sink::LogEventSink;
use catscarer::adapters::time::SystemClock;
use catscarer::app::commands::DeviceCommand;
use catscarer::app::ports::Peripherals;
use catscarer::app::service::DeviceService;
use catscarer::config::DeviceConfig;
use catscarer::drivers::buzzer::Buzzer;
use catscarer::drivers::fan::PwmFan;
use catscarer::drivers::hw_init;
use catscarer::drivers::pir::PirSensor;
use catscarer::drivers::remote::IrRemote;
use catscarer::drivers::status_led::RgbLed;
use catscarer::drivers::NoDecoder;
use catscarer::pins;
use catscarer::timing::Clock;

const CONSOLE_STACK_BYTES: usize = 4096;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  CatScarer v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Hardware ───────────────────────────────────────────
    hw_init::init_peripherals()?;

    let config = DeviceConfig::default();
    config.validate()?;

    let pir = PirSensor::new(GpioInput::new(pins::PIR_GPIO), config.warmup_ms);
    let fan = PwmFan::new(LedcPwm::new(pins::LEDC_CH_FAN));
    let buzzer = Buzzer::new(LedcTone::buzzer(), config.siren_period_ms)?;
    let led = RgbLed::new(
        LedcPwm::new(pins::LEDC_CH_LED_R),
        LedcPwm::new(pins::LEDC_CH_LED_G),
        GpioOutput::new(pins::LED_B_GPIO),
    );
    let remote = IrRemote::new(
        GpioInput::new(pins::REMOTE_GPIO),
        NoDecoder,
        config.remote_power_code,
        config.debounce_ms,
    );

    // ── 3. Service ────────────────────────────────────────────
    let interval = Duration::from_millis(u64::from(config.control_loop_interval_ms));
    let io = Peripherals::new(pir, fan, buzzer, led, remote);
    let mut service = DeviceService::new(io, config)?;
    let clock = SystemClock::new();
    let mut sink = LogEventSink::new();

    service.start(clock.now_ms(), &mut sink);

    // ── 4. Serial console ─────────────────────────────────────
    let (tx, rx) = mpsc::channel::<u8>();
    thread::Builder::new()
        .name("console".into())
        .stack_size(CONSOLE_STACK_BYTES)
        .spawn(move || {
            for byte in std::io::stdin().bytes() {
                let Ok(byte) = byte else { break };
                if tx.send(byte).is_err() {
                    break;
                }
            }
        })?;

    // ── 5. Control loop ───────────────────────────────────────
    info!("Entering control loop ({}ms cycle)", interval.as_millis());
    loop {
        while let Ok(byte) = rx.try_recv() {
            match DeviceCommand::from_console(byte) {
                Some(cmd) => {
                    info!("Console command: {:?}", cmd);
                    service.handle_command(cmd, clock.now_ms(), &mut sink);
                }
                None if byte.is_ascii_graphic() => {
                    warn!("Console: unknown command '{}'", byte as char);
                }
                None => {}
            }
        }

        service.run_cycle(&clock, &mut sink);
        thread::sleep(interval);
    }
}
