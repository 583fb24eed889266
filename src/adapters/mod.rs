//! Adapters: concrete implementations of the port traits and HAL seams.
//!
//! | Adapter    | Implements                               | Connects to        |
//! |------------|------------------------------------------|--------------------|
//! | `hardware` | embedded-hal pins/PWM, `ToneGenerator`   | ESP32 GPIO, LEDC   |
//! | `log_sink` | `EventSink`                              | Serial log output  |
//! | `time`     | `Clock`                                  | ESP32 system timer |

pub mod hardware;
pub mod log_sink;
pub mod time;
