//! Fail-safe fill timer.
//!
//! The last line of defence against a stuck sensor: tracks how long the
//! water has been on since the last off→on transition and latches once a
//! hard ceiling is crossed. The latch is deliberately irreversible — only
//! [`reset`](FailSafeTimer::reset), which in production means a board
//! reset, clears it. A controller that relied on ever seeing a "full"
//! reading to stop would flood the yard the day the sensor sticks low.
//!
//! ## Latch lifecycle
//!
//! 1. `start(now)` on every off→on transition; elapsed restarts at zero.
//! 2. `expired(now)` is polled every control tick. The first poll at or
//!    past the ceiling latches and logs at `error!`.
//! 3. Once latched, `expired` stays true regardless of `start`/`stop`.
//! 4. `freeze(now)` pins the elapsed value when the controller enters
//!    `FailedShutdown`, so diagnostics keep reporting the final on-time.

use log::error;

/// Latched elapsed-time ceiling over the "water on" interval.
pub struct FailSafeTimer {
    ceiling_ms: u64,
    started_at: Option<u64>,
    latched: bool,
    frozen_elapsed: Option<u64>,
}

impl FailSafeTimer {
    pub fn new(ceiling_ms: u64) -> Self {
        Self {
            ceiling_ms,
            started_at: None,
            latched: false,
            frozen_elapsed: None,
        }
    }

    /// Begin counting. Called on every off→on transition; restarts the
    /// elapsed interval at zero. Does not clear the latch.
    pub fn start(&mut self, now_ms: u64) {
        self.started_at = Some(now_ms);
    }

    /// Stop counting. Called on a normal on→off transition; elapsed reads
    /// zero while stopped.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    /// Milliseconds of continuous on-time, or the frozen value after a
    /// failed shutdown, or zero while stopped.
    pub fn elapsed(&self, now_ms: u64) -> u64 {
        if let Some(frozen) = self.frozen_elapsed {
            return frozen;
        }
        self.started_at.map_or(0, |t| now_ms.saturating_sub(t))
    }

    /// Whether the ceiling has been crossed. Latches on first crossing and
    /// stays true until [`reset`](Self::reset).
    pub fn expired(&mut self, now_ms: u64) -> bool {
        if !self.latched && self.started_at.is_some() && self.elapsed(now_ms) >= self.ceiling_ms {
            self.latched = true;
            error!(
                "fail-safe ceiling crossed after {} ms of continuous fill — \
                 filling disabled until board reset",
                self.elapsed(now_ms)
            );
        }
        self.latched
    }

    /// Latch state without re-evaluating the ceiling.
    pub fn tripped(&self) -> bool {
        self.latched
    }

    /// Pin the elapsed value at its current reading. Called on entry to
    /// `FailedShutdown`; subsequent `elapsed` calls return this value.
    pub fn freeze(&mut self, now_ms: u64) {
        if self.frozen_elapsed.is_none() {
            self.frozen_elapsed = Some(self.elapsed(now_ms));
        }
    }

    /// Full clear. Only a controller reset (board reboot) may call this;
    /// no normal state transition does.
    pub fn reset(&mut self) {
        *self = Self::new(self.ceiling_ms);
    }
}
