//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). Strictly one-way: an
//! operator watching the serial console sees every decision, and nothing
//! here can influence one.

use log::{info, warn};

use crate::app::events::FillEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`FillEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &FillEvent) {
        match event {
            FillEvent::Diagnostics(d) => {
                info!(
                    "DIAG  | state={:?} | level={:?} raw={} | on_for={}s | \
                     fail_safe={} | tick={}",
                    d.state,
                    d.level,
                    d.raw_reading,
                    d.elapsed_on_ms / 1000,
                    if d.fail_safe_tripped { "TRIPPED" } else { "armed" },
                    d.tick_count,
                );
            }
            FillEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            FillEvent::LevelChanged(level) => {
                info!("LEVEL | confirmed {:?}", level);
            }
            FillEvent::FailSafeTripped { elapsed_ms } => {
                warn!(
                    "FAILSAFE | ceiling crossed after {}s — reset required",
                    elapsed_ms / 1000
                );
            }
            FillEvent::ValveFault(e) => {
                warn!("VALVE | actuation fault: {}", e);
            }
            FillEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
