//! Submerged pressure transducer — analog water-depth sensing.
//!
//! The transducer sits at the bottom of the tank and reports head
//! pressure as a voltage, read through ADC1. Readings rise with depth,
//! so they compare directly against the configured thresholds.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: oneshot ADC reads via hw_init helpers.
//! On host/test: readings come from a settable atomic, so scenarios can
//! script the water level.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::drivers::LevelSense;

#[cfg(not(target_os = "espidf"))]
static SIM_DEPTH: AtomicU16 = AtomicU16::new(0);

/// Set the simulated raw depth reading (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_depth(raw: u16) {
    SIM_DEPTH.store(raw, Ordering::Relaxed);
}

pub struct PressureSensor {
    _gpio: i32,
    last_raw: u16,
}

impl PressureSensor {
    pub fn new(gpio: i32) -> Self {
        Self {
            _gpio: gpio,
            last_raw: 0,
        }
    }

    #[cfg(target_os = "espidf")]
    fn sample(&self) -> u16 {
        crate::drivers::hw_init::adc1_read(crate::pins::LEVEL_ADC_CHANNEL)
    }

    #[cfg(not(target_os = "espidf"))]
    fn sample(&self) -> u16 {
        SIM_DEPTH.load(Ordering::Relaxed)
    }

    /// Last reading taken, without sampling again.
    pub fn last_raw(&self) -> u16 {
        self.last_raw
    }
}

impl LevelSense for PressureSensor {
    fn read_raw(&mut self) -> u16 {
        self.last_raw = self.sample();
        self.last_raw
    }
}
