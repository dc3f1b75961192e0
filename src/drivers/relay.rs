//! Paired-relay valve-group driver.
//!
//! Each valve group (tank feed, sprinkler output) is switched through two
//! relay channels wired in parallel on the 4-channel board, so one driver
//! instance owns a pin pair and always switches both together.
//!
//! ## Safety contract
//!
//! This is a dumb actuator: sequencing and fail-safe decisions live in
//! the service. The only intelligence here is reporting an unconfirmed
//! write, which the service treats as fatal.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::error::ValveError;

pub struct RelayPair {
    gpio_a: i32,
    gpio_b: i32,
    energised: bool,
}

impl RelayPair {
    pub fn new(gpio_a: i32, gpio_b: i32) -> Self {
        Self {
            gpio_a,
            gpio_b,
            energised: false,
        }
    }

    /// Energise or release both relays of the group. Idempotent.
    pub fn set(&mut self, on: bool) -> Result<(), ValveError> {
        hw_init::gpio_write(self.gpio_a, on).map_err(|_| ValveError::GpioWriteFailed)?;
        hw_init::gpio_write(self.gpio_b, on).map_err(|_| ValveError::GpioWriteFailed)?;
        self.energised = on;
        Ok(())
    }

    pub fn is_energised(&self) -> bool {
        self.energised
    }
}
