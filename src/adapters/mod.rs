//! Driven adapters — concrete implementations of the port traits.
//!
//! Everything here is replaceable from the domain core's point of view:
//! the service only ever sees `SensorPort`, `ValvePort`, `Clock`, and
//! `EventSink`.

pub mod hardware;
pub mod log_sink;
pub mod time;
