//! IR beam level sensor pair — the digital sensing variant.
//!
//! A floating pipe inside an outer guide pipe carries a flag across two
//! IR beams. When the water drops, the float sinks and unblocks the
//! lower beam (tank needs water); when the water rises far enough, the
//! flag blocks the upper beam (tank full).
//!
//! The driver maps the two booleans onto synthetic readings in the same
//! range the pressure transducer produces, so the controller's threshold
//! comparison works unchanged whichever sensor the board carries.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: beam states come from settable atomics.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use crate::drivers::LevelSense;

/// Synthetic reading when the lower beam is clear (float sank).
pub const SYNTH_LOW: u16 = 0;
/// Synthetic reading when only the lower beam is blocked.
pub const SYNTH_NOMINAL: u16 = 2048;
/// Synthetic reading when the upper beam is blocked.
pub const SYNTH_FULL: u16 = 4095;

#[cfg(not(target_os = "espidf"))]
static SIM_LOW_BLOCKED: AtomicBool = AtomicBool::new(true);
#[cfg(not(target_os = "espidf"))]
static SIM_HIGH_BLOCKED: AtomicBool = AtomicBool::new(false);

/// Set the simulated lower-beam state (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_low_blocked(blocked: bool) {
    SIM_LOW_BLOCKED.store(blocked, Ordering::Relaxed);
}

/// Set the simulated upper-beam state (host builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_high_blocked(blocked: bool) {
    SIM_HIGH_BLOCKED.store(blocked, Ordering::Relaxed);
}

pub struct IrLevelSensor {
    _low_gpio: i32,
    _high_gpio: i32,
}

impl IrLevelSensor {
    pub fn new(low_gpio: i32, high_gpio: i32) -> Self {
        Self {
            _low_gpio: low_gpio,
            _high_gpio: high_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    fn beams(&self) -> (bool, bool) {
        use crate::drivers::hw_init;
        (
            hw_init::gpio_read(self._low_gpio),
            hw_init::gpio_read(self._high_gpio),
        )
    }

    #[cfg(not(target_os = "espidf"))]
    fn beams(&self) -> (bool, bool) {
        (
            SIM_LOW_BLOCKED.load(Ordering::Relaxed),
            SIM_HIGH_BLOCKED.load(Ordering::Relaxed),
        )
    }
}

impl LevelSense for IrLevelSensor {
    fn read_raw(&mut self) -> u16 {
        let (low_blocked, high_blocked) = self.beams();
        if !low_blocked {
            SYNTH_LOW
        } else if high_blocked {
            SYNTH_FULL
        } else {
            SYNTH_NOMINAL
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::config::FillConfig;
    use crate::fsm::context::Level;
    use crate::pins;

    fn sensor() -> IrLevelSensor {
        IrLevelSensor::new(pins::IR_LOW_DETECT_GPIO, pins::IR_HIGH_DETECT_GPIO)
    }

    #[test]
    fn synthetic_readings_classify_like_the_analog_variant() {
        let config = FillConfig::default();
        let mut s = sensor();

        sim_set_low_blocked(false);
        sim_set_high_blocked(false);
        assert_eq!(Level::classify(s.read_raw(), &config), Level::Low);

        sim_set_low_blocked(true);
        assert_eq!(Level::classify(s.read_raw(), &config), Level::Nominal);

        sim_set_high_blocked(true);
        assert_eq!(Level::classify(s.read_raw(), &config), Level::Full);
    }
}
