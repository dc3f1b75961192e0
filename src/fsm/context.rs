//! Shared mutable context threaded through every FSM handler.
//!
//! `FillContext` is the single struct that state handlers read from and
//! write to: the latest confirmed level, fail-safe and hold status, the
//! requested valve position, and configuration. The service fills in the
//! inputs before each tick and applies the outputs after.

use crate::config::FillConfig;

// ---------------------------------------------------------------------------
// Level classification (input side)
// ---------------------------------------------------------------------------

/// Classification of a raw sensor reading against the configured
/// thresholds. This is what the debounce filter confirms — never the raw
/// scalar itself, which would make "5 identical reads" meaningless for an
/// analog sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Below `low_threshold`: the tank needs water.
    Low,
    /// Between the thresholds.
    Nominal,
    /// At or above `full_threshold`.
    Full,
}

impl Level {
    pub fn classify(raw: u16, config: &FillConfig) -> Self {
        if raw < config.low_threshold {
            Self::Low
        } else if raw >= config.full_threshold {
            Self::Full
        } else {
            Self::Nominal
        }
    }
}

// ---------------------------------------------------------------------------
// Valve request (output side)
// ---------------------------------------------------------------------------

/// Desired valve position, written by state handlers. The service turns a
/// *change* of request into the sequenced open/close protocol; an
/// unchanged request issues no commands at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValvePosition {
    Open,
    Closed,
}

// ---------------------------------------------------------------------------
// FillContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
pub struct FillContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Inputs (written by the service before each tick) --
    /// Debounced level; `None` until the filter first establishes one.
    pub level: Option<Level>,
    /// Raw reading behind the classification, kept for diagnostics only.
    pub raw_reading: u16,
    /// Fail-safe ceiling status, evaluated every tick without exception.
    pub ceiling_expired: bool,
    /// True while the post-transition hold window suppresses level-driven
    /// transitions. Never suppresses the ceiling.
    pub hold_active: bool,

    // -- Output (written by state handlers) --
    pub valves: ValvePosition,

    // -- Configuration --
    pub config: FillConfig,
}

impl FillContext {
    pub fn new(config: FillConfig) -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            level: None,
            raw_reading: 0,
            ceiling_expired: false,
            hold_active: false,
            valves: ValvePosition::Closed,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_against_default_thresholds() {
        let c = FillConfig::default();
        assert_eq!(Level::classify(0, &c), Level::Low);
        assert_eq!(Level::classify(c.low_threshold - 1, &c), Level::Low);
        assert_eq!(Level::classify(c.low_threshold, &c), Level::Nominal);
        assert_eq!(Level::classify(c.full_threshold - 1, &c), Level::Nominal);
        assert_eq!(Level::classify(c.full_threshold, &c), Level::Full);
        assert_eq!(Level::classify(u16::MAX, &c), Level::Full);
    }

    #[test]
    fn fresh_context_requests_closed_valves() {
        let ctx = FillContext::new(FillConfig::default());
        assert_eq!(ctx.valves, ValvePosition::Closed);
        assert_eq!(ctx.level, None);
        assert!(!ctx.ceiling_expired);
    }
}
