//! Application service — the hexagonal core.
//!
//! [`FillService`] owns the FSM, the debounce filter, and the fail-safe
//! timer, and exposes a clean, hardware-agnostic API. All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters and a hand-advanced clock.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         FillService          │
//!   ValvePort ◀── │  Debounce · FailSafe · FSM   │ ◀── Clock
//!                 └─────────────────────────────┘
//! ```
//!
//! A full controller reset is *construction*: drop the service and build
//! a new one (on hardware, the board reboot does this). There is no
//! in-place reset path, so nothing can accidentally clear the fail-safe
//! latch while the process lives.

use log::{error, info};

use crate::config::FillConfig;
use crate::debounce::Debouncer;
use crate::error::{Result, ValveError};
use crate::fsm::context::{FillContext, Level, ValvePosition};
use crate::fsm::states::build_state_table;
use crate::fsm::{FillState, Fsm};
use crate::safety::FailSafeTimer;

use super::events::{DiagnosticReport, FillEvent};
use super::ports::{Clock, EventSink, SensorPort, ValvePort};

// ───────────────────────────────────────────────────────────────
// FillService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all fill-control logic.
pub struct FillService {
    fsm: Fsm,
    ctx: FillContext,
    debouncer: Debouncer<Level>,
    failsafe: FailSafeTimer,
    /// Last valve position actually commanded; sequences are issued only
    /// when the FSM's request diverges from this.
    valves_open: bool,
    /// End of the current post-transition hold window, if one is active.
    hold_until_ms: Option<u64>,
    min_hold_ms: u64,
    tick_count: u64,
}

impl FillService {
    /// Construct the service. Rejects an invalid configuration here —
    /// a bad threshold pair or a hold longer than the ceiling must never
    /// reach the control loop.
    pub fn new(config: FillConfig) -> Result<Self> {
        config.validate()?;
        let debouncer = Debouncer::new(config.debounce_samples);
        let failsafe = FailSafeTimer::new(config.max_on_time_ms());
        let min_hold_ms = config.min_hold_ms();
        let ctx = FillContext::new(config);
        let fsm = Fsm::new(build_state_table(), FillState::Off);

        Ok(Self {
            fsm,
            ctx,
            debouncer,
            failsafe,
            valves_open: false,
            hold_until_ms: None,
            min_hold_ms,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial state's `on_enter` and announce the start.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        self.fsm.start(&mut self.ctx);
        sink.emit(&FillEvent::Started(self.fsm.current_state()));
        info!("FillService started in {:?}", self.fsm.current_state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read → debounce → fail-safe → FSM →
    /// valves.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ValvePort`] — one adapter owns the whole rig, and this avoids a
    /// double mutable borrow while keeping the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ValvePort),
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let now = clock.now_ms();
        let prev_state = self.fsm.current_state();

        // 1. Read the sensor and debounce the classification.
        let raw = hw.read_level();
        self.ctx.raw_reading = raw;
        let sample = Level::classify(raw, &self.ctx.config);
        if let Some(changed) = self.debouncer.observe(sample) {
            sink.emit(&FillEvent::LevelChanged(changed));
        }
        self.ctx.level = self.debouncer.confirmed();

        // 2. Fail-safe ceiling — evaluated every tick, before the FSM,
        //    independent of what the sensor says.
        self.ctx.ceiling_expired = self.failsafe.expired(now);

        // 3. Post-transition hold window.
        self.ctx.hold_active = self.hold_until_ms.is_some_and(|t| now < t);

        // 4. FSM tick (pure state logic).
        self.fsm.tick(&mut self.ctx);

        // 5. Transition bookkeeping.
        let new_state = self.fsm.current_state();
        if new_state != prev_state {
            match new_state {
                FillState::On => {
                    self.failsafe.start(now);
                    self.hold_until_ms = Some(now + self.min_hold_ms);
                }
                FillState::Off => {
                    self.failsafe.stop();
                    self.hold_until_ms = Some(now + self.min_hold_ms);
                }
                FillState::FailedShutdown => {
                    self.failsafe.freeze(now);
                    sink.emit(&FillEvent::FailSafeTripped {
                        elapsed_ms: self.failsafe.elapsed(now),
                    });
                }
            }
            sink.emit(&FillEvent::StateChanged {
                from: prev_state,
                to: new_state,
            });
        }

        // 6. Apply the valve request via the sequenced protocol.
        self.apply_valves(hw, clock, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build an observational snapshot. Safe to call in any state,
    /// including `FailedShutdown` (where the frozen on-time explains why
    /// the water stopped).
    pub fn diagnostics(&self, now_ms: u64) -> DiagnosticReport {
        DiagnosticReport {
            state: self.fsm.current_state(),
            level: self.ctx.level,
            raw_reading: self.ctx.raw_reading,
            elapsed_on_ms: self.failsafe.elapsed(now_ms),
            fail_safe_tripped: self.failsafe.tripped(),
            tick_count: self.tick_count,
        }
    }

    /// Current FSM state.
    pub fn state(&self) -> FillState {
        self.fsm.current_state()
    }

    /// Total control ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    /// Turn a *change* of requested valve position into the sequenced
    /// open/close protocol. An unchanged request issues no commands —
    /// which is how `FailedShutdown` stays silent after its entry close.
    fn apply_valves(
        &mut self,
        hw: &mut (impl SensorPort + ValvePort),
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        let want_open = self.ctx.valves == ValvePosition::Open;
        if want_open == self.valves_open {
            return;
        }

        let result = if want_open {
            Self::open_sequence(hw, clock, &self.ctx.config)
        } else {
            Self::close_sequence(hw, clock, &self.ctx.config)
        };

        match result {
            Ok(()) => self.valves_open = want_open,
            Err(e) => self.escalate_valve_fault(e, hw, clock, sink),
        }
    }

    /// Opening: feed valves first, let the supply line prime, then the
    /// sprinkler valves. Reversing this order dry-runs the pump.
    fn open_sequence(
        hw: &mut impl ValvePort,
        clock: &mut impl Clock,
        config: &FillConfig,
    ) -> core::result::Result<(), ValveError> {
        hw.set_feed(true)?;
        clock.wait_ms(config.priming_ms);
        hw.set_output(true)
    }

    /// Closing: sprinkler valves first, let the line drain back into the
    /// tank, then the feed valves. Reversing this order backflows.
    fn close_sequence(
        hw: &mut impl ValvePort,
        clock: &mut impl Clock,
        config: &FillConfig,
    ) -> core::result::Result<(), ValveError> {
        hw.set_output(false)?;
        clock.wait_ms(config.drain_ms);
        hw.set_feed(false)
    }

    /// An unconfirmed valve command is unsafe to retry: latch into
    /// `FailedShutdown`, then make exactly one best-effort attempt to
    /// drive both groups shut.
    fn escalate_valve_fault(
        &mut self,
        fault: ValveError,
        hw: &mut impl ValvePort,
        clock: &mut impl Clock,
        sink: &mut impl EventSink,
    ) {
        error!("valve actuation failed ({fault}) — entering failed shutdown");
        sink.emit(&FillEvent::ValveFault(fault));

        let prev = self.fsm.current_state();
        self.failsafe.freeze(clock.now_ms());
        self.fsm
            .force_transition(FillState::FailedShutdown, &mut self.ctx);

        let output = hw.set_output(false);
        let feed = hw.set_feed(false);
        if output.is_err() || feed.is_err() {
            error!("best-effort valve close also failed; waiting for board reset");
        }
        self.valves_open = false;

        if prev != FillState::FailedShutdown {
            sink.emit(&FillEvent::StateChanged {
                from: prev,
                to: FillState::FailedShutdown,
            });
        }
    }
}
