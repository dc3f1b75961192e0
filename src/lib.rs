//! Tankfill firmware library.
//!
//! Unattended tank-fill controller: a debounced level reading drives a
//! three-state fill machine (`Off` / `On` / `FailedShutdown`) whose
//! fail-safe timer guarantees the water can never run forever, whatever
//! the sensor does. The domain core is pure logic behind port traits;
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module, so the whole crate builds and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fsm;
pub mod safety;

pub mod adapters;
pub mod drivers;
pub mod pins;
