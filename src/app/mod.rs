//! Application core: pure domain logic, zero I/O.
//!
//! Per-cycle orchestration of the deterrent: advance peripherals, tick the
//! state machine, report what happened.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
