//! Hardware adapter — bridges real peripherals to the domain port traits.
//!
//! Owns the level-sensing driver and both relay pairs, exposing them
//! through [`SensorPort`] and [`ValvePort`]. This is the only module in
//! the system (beyond the drivers it owns) that touches actual hardware;
//! on non-espidf targets the underlying drivers fall back to simulation
//! state.

use crate::app::ports::{SensorPort, ValvePort};
use crate::drivers::LevelSense;
use crate::drivers::relay::RelayPair;
use crate::error::ValveError;

/// Concrete adapter combining the sensing driver and the relay board.
/// Generic over the sensor so a board can carry either the pressure
/// transducer or the IR beam pair.
pub struct HardwareAdapter<S: LevelSense> {
    sensor: S,
    feed: RelayPair,
    output: RelayPair,
}

impl<S: LevelSense> HardwareAdapter<S> {
    pub fn new(sensor: S, feed: RelayPair, output: RelayPair) -> Self {
        Self {
            sensor,
            feed,
            output,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: LevelSense> SensorPort for HardwareAdapter<S> {
    fn read_level(&mut self) -> u16 {
        self.sensor.read_raw()
    }
}

// ── ValvePort implementation ──────────────────────────────────

impl<S: LevelSense> ValvePort for HardwareAdapter<S> {
    fn set_feed(&mut self, open: bool) -> Result<(), ValveError> {
        self.feed.set(open)
    }

    fn set_output(&mut self, open: bool) -> Result<(), ValveError> {
        self.output.set(open)
    }
}
