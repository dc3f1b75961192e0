//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern: a fixed table of state descriptors, each
//! a row of plain `fn` pointers — no closures, no dynamic dispatch, no
//! heap.
//!
//! ```text
//! ┌────────────────┬───────────┬──────────┬───────────────────┐
//! │ FillState      │ on_enter  │ on_exit  │ on_update         │
//! ├────────────────┼───────────┼──────────┼───────────────────┤
//! │ Off            │ fn(ctx)   │ —        │ fn(ctx)->Option<> │
//! │ On             │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │
//! │ FailedShutdown │ fn(ctx)   │ —        │ fn(ctx)->Option<> │
//! └────────────────┴───────────┴──────────┴───────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the current state. A
//! `Some(next)` return runs `on_exit`, moves the pointer, then runs the
//! next state's `on_enter`. Handlers receive `&mut FillContext`.

pub mod context;
pub mod states;

use context::FillContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The three fill states. `Off` and `On` are reversible; `FailedShutdown`
/// is terminal until the controller is reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FillState {
    Off = 0,
    On = 1,
    FailedShutdown = 2,
}

impl FillState {
    /// Total number of states — sizes the table array.
    pub const COUNT: usize = 3;

    /// Convert a table index back to a `FillState`. Panics on
    /// out-of-range in debug builds; returns `FailedShutdown` in release
    /// (the safe fallback: a corrupt index must not open a valve).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Off,
            1 => Self::On,
            2 => Self::FailedShutdown,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::FailedShutdown
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions, run once per transition.
pub type StateActionFn = fn(&mut FillContext);

/// Per-tick update handler. `Some(next)` requests a transition.
pub type StateUpdateFn = fn(&mut FillContext) -> Option<FillState>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single state.
pub struct StateDescriptor {
    pub id: FillState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The state machine engine. Owns the table and the current-state index;
/// the context is threaded through every handler call.
pub struct Fsm {
    table: [StateDescriptor; FillState::COUNT],
    current: usize,
    tick_count: u64,
    state_entry_tick: u64,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; FillState::COUNT], initial: FillState) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter`. Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FillContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick: update the current state, then execute any
    /// requested transition (`on_exit` → pointer move → `on_enter`).
    pub fn tick(&mut self, ctx: &mut FillContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        if let Some(next) = (self.table[self.current].on_update)(ctx) {
            self.transition(next, ctx);
        }
    }

    /// Force an immediate transition regardless of what `on_update` would
    /// decide — used when actuation fails and the service must reach
    /// `FailedShutdown` without waiting for the next tick.
    pub fn force_transition(&mut self, next: FillState, ctx: &mut FillContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    pub fn current_state(&self) -> FillState {
        FillState::from_index(self.current)
    }

    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: FillState, ctx: &mut FillContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
