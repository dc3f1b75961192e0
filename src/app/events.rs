//! Outbound application events.
//!
//! The [`FillService`](super::service::FillService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. The shipped adapter
//! writes them to the serial log; a future display or telemetry adapter
//! would implement the same trait.

use crate::error::ValveError;
use crate::fsm::FillState;
use crate::fsm::context::Level;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum FillEvent {
    /// The service has started (carries the initial state).
    Started(FillState),

    /// The debounce filter accepted a level change as real.
    LevelChanged(Level),

    /// The FSM transitioned between states.
    StateChanged { from: FillState, to: FillState },

    /// The fail-safe ceiling latched; `elapsed_ms` is the frozen on-time.
    FailSafeTripped { elapsed_ms: u64 },

    /// A valve command failed; the controller is heading to
    /// `FailedShutdown`.
    ValveFault(ValveError),

    /// Periodic observational snapshot.
    Diagnostics(DiagnosticReport),
}

/// A point-in-time snapshot of everything an operator needs to see why
/// the water is (or is not) running. Keeps flowing in `FailedShutdown`
/// so the fault and the required reset are visible.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub state: FillState,
    pub level: Option<Level>,
    pub raw_reading: u16,
    pub elapsed_on_ms: u64,
    pub fail_safe_tripped: bool,
    pub tick_count: u64,
}
