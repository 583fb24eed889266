//! CatScarer firmware library.
//!
//! PIR-triggered deterrent: when motion is seen the fan runs, a two-tone
//! siren wails and the status LED turns red until the area has been quiet
//! for the activation hold.  An IR remote (or the same line used as a
//! button) disables and re-enables the device.
//!
//! Exposes the pure-logic modules for integration testing.  All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod pins;
pub mod siren;
pub mod timing;
