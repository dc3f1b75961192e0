//! System configuration parameters.
//!
//! All tunable parameters for the tank-fill controller. The configuration
//! is immutable for the lifetime of a [`FillService`](crate::app::service::FillService);
//! the only way to change it is a full controller reset.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    // --- Level thresholds (raw sensor units) ---
    /// Readings below this mean the tank needs water.
    pub low_threshold: u16,
    /// Readings at or above this mean the tank is full.
    pub full_threshold: u16,

    // --- Debounce ---
    /// Consecutive identical reads required before a level change is
    /// accepted as real.
    pub debounce_samples: u8,

    // --- Fail-safe ---
    /// Hard ceiling on continuous fill time. Crossing it latches the
    /// controller into `FailedShutdown` until the board is reset. Should
    /// comfortably exceed the time to fill the tank from empty.
    pub max_on_time_secs: u32,
    /// After any on/off transition, level-driven transitions are ignored
    /// for this long to stop chatter when the level sits near a threshold.
    pub min_hold_secs: u32,

    // --- Valve sequencing ---
    /// Delay between opening the tank-feed valves and the sprinkler
    /// (output) valves, letting the supply line prime.
    pub priming_ms: u32,
    /// Delay between closing the output valves and the feed valves,
    /// letting the line drain back into the tank.
    pub drain_ms: u32,

    // --- Timing ---
    /// Poll loop period (milliseconds).
    pub tick_interval_ms: u32,
    /// Diagnostics report interval (seconds).
    pub diagnostics_interval_secs: u32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            // Thresholds
            low_threshold: 1000,
            full_threshold: 3000,

            // Debounce: a change must be read 5 times in a row
            debounce_samples: 5,

            // Fail-safe
            max_on_time_secs: 3600, // 60 min
            min_hold_secs: 600,     // 10 min

            // Valve sequencing
            priming_ms: 5_000,
            drain_ms: 60_000,

            // Timing
            tick_interval_ms: 6_000,
            diagnostics_interval_secs: 60,
        }
    }
}

impl FillConfig {
    /// Reject invalid parameter combinations before the controller is
    /// built. A bad configuration must never be discovered at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.full_threshold <= self.low_threshold {
            return Err(Error::Config("full_threshold must exceed low_threshold"));
        }
        if self.debounce_samples == 0 {
            return Err(Error::Config("debounce_samples must be at least 1"));
        }
        if self.max_on_time_secs <= self.min_hold_secs {
            return Err(Error::Config("max_on_time_secs must exceed min_hold_secs"));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero"));
        }
        Ok(())
    }

    /// Fail-safe ceiling in milliseconds.
    pub fn max_on_time_ms(&self) -> u64 {
        u64::from(self.max_on_time_secs) * 1000
    }

    /// Minimum-hold window in milliseconds.
    pub fn min_hold_ms(&self) -> u64 {
        u64::from(self.min_hold_secs) * 1000
    }
}
