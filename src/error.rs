//! Unified error types for the tankfill firmware.
//!
//! A small `Copy` enum tree that every fallible operation funnels into,
//! keeping the control loop's error handling uniform. Sensor noise is
//! deliberately absent: transient readings are absorbed by the debounce
//! filter and never surface as errors.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A valve actuation command failed.
    Valve(ValveError),
    /// Configuration rejected at construction time.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valve(e) => write!(f, "valve: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Valve actuation errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`ValvePort`](crate::app::ports::ValvePort)
/// implementation. Any of these is fatal to the fill path: an unconfirmed
/// valve command must never be retried, so the controller escalates to
/// `FailedShutdown` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveError {
    /// GPIO set for one of the relay pins failed.
    GpioWriteFailed,
    /// The relay driver did not acknowledge the command.
    Unresponsive,
}

impl fmt::Display for ValveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::Unresponsive => write!(f, "relay driver unresponsive"),
        }
    }
}

impl std::error::Error for ValveError {}

impl From<ValveError> for Error {
    fn from(e: ValveError) -> Self {
        Self::Valve(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
