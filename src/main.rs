//! Tankfill firmware — main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter      LogEventSink      MonotonicClock   │
//! │  (Sensor+Valve)       (EventSink)       (Clock)          │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ──────────────       │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │           FillService (pure logic)             │      │
//! │  │        Debounce · FailSafe · Fill FSM          │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! One blocking poll loop drives read → debounce → decide → actuate. A
//! board reset is the controller reset: it reconstructs every entity,
//! which is the only way out of a failed shutdown.

#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use tankfill::adapters::hardware::HardwareAdapter;
use tankfill::adapters::log_sink::LogEventSink;
use tankfill::adapters::time::MonotonicClock;
use tankfill::app::events::FillEvent;
use tankfill::app::ports::{Clock, EventSink};
use tankfill::app::service::FillService;
use tankfill::config::FillConfig;
use tankfill::drivers::pressure::PressureSensor;
use tankfill::drivers::relay::RelayPair;
use tankfill::drivers::hw_init;
use tankfill::pins;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("tankfill v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripheral init ────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt with the
        // relays de-energised (their power-on default).
        error!("peripheral init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration (validated before anything can move) ─
    let config = FillConfig::default();
    config.validate().map_err(|e| anyhow::anyhow!("{e}"))?;

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(
        PressureSensor::new(pins::LEVEL_ADC_GPIO),
        RelayPair::new(pins::TANK_VALVE_1_GPIO, pins::TANK_VALVE_2_GPIO),
        RelayPair::new(pins::SPRINKLER_VALVE_1_GPIO, pins::SPRINKLER_VALVE_2_GPIO),
    );
    let mut clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();

    // ── 5. Service ────────────────────────────────────────────
    let mut service = FillService::new(config.clone()).map_err(|e| anyhow::anyhow!("{e}"))?;
    service.start(&mut sink);

    let diag_every = u64::from(config.diagnostics_interval_secs)
        .saturating_mul(1000)
        .div_ceil(u64::from(config.tick_interval_ms))
        .max(1);

    info!("entering control loop ({} ms tick)", config.tick_interval_ms);

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        service.tick(&mut hw, &mut clock, &mut sink);

        if service.tick_count() % diag_every == 0 {
            let report = service.diagnostics(clock.now_ms());
            sink.emit(&FillEvent::Diagnostics(report));
        }

        clock.wait_ms(config.tick_interval_ms);
    }
}
