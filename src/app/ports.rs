//! Port traits — the hexagonal boundary between domain logic and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ FillService (domain)
//! ```
//!
//! Driven adapters (the level sensor, the relay board, the system timer,
//! the serial log) implement these traits. The
//! [`FillService`](super::service::FillService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::ValveError;

use super::events::FillEvent;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw level reading per poll.
///
/// The value only needs to be comparable against the configured
/// thresholds; the IR adapter synthesises readings in the same range as
/// the pressure adapter. Implementations must return within the tick
/// budget — noise is fine (the debounce filter owns that problem),
/// blocking is not.
pub trait SensorPort {
    fn read_level(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Valve port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: binary actuation of the two valve groups.
///
/// Both operations are idempotent and synchronous. A returned error means
/// the command is *unconfirmed* — the domain treats that as fatal and
/// never retries, because retrying an unconfirmed valve command risks an
/// unbounded open valve.
pub trait ValvePort {
    /// Open/close the tank-feed valves.
    fn set_feed(&mut self, open: bool) -> Result<(), ValveError>;

    /// Open/close the sprinkler (output) valves.
    fn set_output(&mut self, open: bool) -> Result<(), ValveError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source. `now_ms` must never go backwards and must be
/// unaffected by wall-clock adjustments; `wait_ms` blocks the (single)
/// control thread, which is how the valve sequencing delays and the tick
/// period are expressed.
pub trait Clock {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Block for the given duration.
    fn wait_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// One-way observational output. The domain emits structured
/// [`FillEvent`]s through this port; adapters decide where they go.
/// Nothing emitted here may ever feed back into a control decision.
pub trait EventSink {
    fn emit(&mut self, event: &FillEvent);
}
