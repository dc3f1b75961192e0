//! Concrete state handler functions and table builder.
//!
//! ```text
//!   OFF ──[level Low, hold elapsed]──▶ ON
//!    ▲                                 │
//!    └──[level Full, hold elapsed]─────┤
//!                                      │
//!              [fail-safe ceiling]     ▼
//!   ON ─────────────────────────▶ FAILED_SHUTDOWN ──▶ (board reset only)
//! ```
//!
//! The ceiling guard comes first in `on_update` for ON and never consults
//! the level or the hold window: a sensor stuck at "low" is exactly the
//! fault it exists to catch, so the handler must not depend on ever
//! observing "full".

use log::{info, warn};

use super::context::{FillContext, Level, ValvePosition};
use super::{FillState, StateDescriptor};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at service construction.
pub fn build_state_table() -> [StateDescriptor; FillState::COUNT] {
    [
        // Index 0 — Off
        StateDescriptor {
            id: FillState::Off,
            name: "Off",
            on_enter: Some(off_enter),
            on_exit: None,
            on_update: off_update,
        },
        // Index 1 — On
        StateDescriptor {
            id: FillState::On,
            name: "On",
            on_enter: Some(on_enter),
            on_exit: None,
            on_update: on_update,
        },
        // Index 2 — FailedShutdown
        StateDescriptor {
            id: FillState::FailedShutdown,
            name: "FailedShutdown",
            on_enter: Some(failed_enter),
            on_exit: None,
            on_update: failed_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF — valves closed, watching for a confirmed low level
// ═══════════════════════════════════════════════════════════════════════════

fn off_enter(ctx: &mut FillContext) {
    ctx.valves = ValvePosition::Closed;
    info!("OFF: valves closed, monitoring level");
}

fn off_update(ctx: &mut FillContext) -> Option<FillState> {
    if ctx.hold_active {
        return None;
    }
    if ctx.level == Some(Level::Low) {
        return Some(FillState::On);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ON — filling; the ceiling is checked before anything else
// ═══════════════════════════════════════════════════════════════════════════

fn on_enter(ctx: &mut FillContext) {
    ctx.valves = ValvePosition::Open;
    info!("ON: filling, ceiling at {} s", ctx.config.max_on_time_secs);
}

fn on_update(ctx: &mut FillContext) -> Option<FillState> {
    // Ceiling first, unconditionally: not gated on the level, not gated
    // on the hold window.
    if ctx.ceiling_expired {
        return Some(FillState::FailedShutdown);
    }
    if !ctx.hold_active && ctx.level == Some(Level::Full) {
        info!("ON: tank full at raw={}", ctx.raw_reading);
        return Some(FillState::Off);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAILED_SHUTDOWN — terminal; nothing short of a board reset leaves it
// ═══════════════════════════════════════════════════════════════════════════

fn failed_enter(ctx: &mut FillContext) {
    ctx.valves = ValvePosition::Closed;
    warn!("FAILED_SHUTDOWN: filling disabled until the board is reset");
}

fn failed_update(_ctx: &mut FillContext) -> Option<FillState> {
    None
}
