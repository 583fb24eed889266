//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`DeviceEvent`] as one
//! structured line to the `log` facade (UART / USB-CDC in production via
//! `esp_idf_logger`).

use log::info;

use crate::app::events::DeviceEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`DeviceEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Telemetry(t) => {
                info!(
                    "TELEM | state={:?} | fan={} | siren={} | pir={} | hold={}ms | ticks={}",
                    t.state,
                    t.output_speed,
                    if t.siren_active { "ON" } else { "OFF" },
                    if t.motion_stabilizing { "WARMING" } else { "READY" },
                    t.hold_remaining_ms.unwrap_or(0),
                    t.ticks,
                );
            }
            DeviceEvent::StateChanged { from, to, at } => {
                info!("STATE | {:?} -> {:?} @ {}ms", from, to, at);
            }
            DeviceEvent::StateForced { from, to } => {
                info!("STATE | {:?} -> {:?} (forced)", from, to);
            }
            DeviceEvent::ToggleInjected { accepted, at } => {
                info!(
                    "REMOTE | simulated toggle @ {}ms {}",
                    at,
                    if *accepted { "accepted" } else { "debounced" }
                );
            }
            DeviceEvent::Started { state, at } => {
                info!("START | initial_state={:?} @ {}ms", state, at);
            }
        }
    }
}
