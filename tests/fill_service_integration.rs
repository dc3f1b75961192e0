//! Integration tests: FillService → FSM → valve sequencing.
//!
//! Everything runs against mock ports and a hand-advanced clock, so the
//! multi-minute field timings shrink to instants.

use tankfill::app::events::FillEvent;
use tankfill::app::ports::{Clock, EventSink, SensorPort, ValvePort};
use tankfill::app::service::FillService;
use tankfill::config::FillConfig;
use tankfill::error::ValveError;
use tankfill::fsm::FillState;
use tankfill::fsm::context::Level;

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValveCall {
    Feed(bool),
    Output(bool),
}

struct MockRig {
    depth: u16,
    calls: Vec<ValveCall>,
    fail_feed: bool,
    fail_output: bool,
}

impl MockRig {
    fn new() -> Self {
        Self {
            depth: 2000, // nominal band
            calls: Vec::new(),
            fail_feed: false,
            fail_output: false,
        }
    }
}

impl SensorPort for MockRig {
    fn read_level(&mut self) -> u16 {
        self.depth
    }
}

impl ValvePort for MockRig {
    fn set_feed(&mut self, open: bool) -> Result<(), ValveError> {
        if self.fail_feed {
            return Err(ValveError::GpioWriteFailed);
        }
        self.calls.push(ValveCall::Feed(open));
        Ok(())
    }

    fn set_output(&mut self, open: bool) -> Result<(), ValveError> {
        if self.fail_output {
            return Err(ValveError::GpioWriteFailed);
        }
        self.calls.push(ValveCall::Output(open));
        Ok(())
    }
}

struct MockClock {
    now: u64,
    waits: Vec<u32>,
}

impl MockClock {
    fn new() -> Self {
        Self {
            now: 0,
            waits: Vec::new(),
        }
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn wait_ms(&mut self, ms: u32) {
        self.waits.push(ms);
        self.now += u64::from(ms);
    }
}

struct RecordingSink {
    events: Vec<FillEvent>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { events: Vec::new() }
    }

    fn state_changes(&self) -> Vec<(FillState, FillState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                FillEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &FillEvent) {
        self.events.push(event.clone());
    }
}

// ── Harness ───────────────────────────────────────────────────

const LOW: u16 = 500;
const NOMINAL: u16 = 2000;
const FULL: u16 = 3500;

fn test_config() -> FillConfig {
    FillConfig {
        low_threshold: 1000,
        full_threshold: 3000,
        debounce_samples: 5,
        max_on_time_secs: 60,
        min_hold_secs: 12,
        priming_ms: 50,
        drain_ms: 70,
        tick_interval_ms: 1000,
        diagnostics_interval_secs: 60,
    }
}

struct Harness {
    svc: FillService,
    rig: MockRig,
    clock: MockClock,
    sink: RecordingSink,
}

impl Harness {
    fn new(config: FillConfig) -> Self {
        let mut h = Self {
            svc: FillService::new(config).unwrap(),
            rig: MockRig::new(),
            clock: MockClock::new(),
            sink: RecordingSink::new(),
        };
        h.svc.start(&mut h.sink);
        h
    }

    /// One control cycle at the given depth, then advance one tick period
    /// (mirrors the production loop's trailing wait).
    fn tick(&mut self, depth: u16) {
        self.rig.depth = depth;
        self.svc.tick(&mut self.rig, &mut self.clock, &mut self.sink);
        self.clock.now += 1000;
    }

    fn tick_n(&mut self, depth: u16, n: usize) {
        for _ in 0..n {
            self.tick(depth);
        }
    }

    /// Tick until the service reaches `state` or `limit` ticks pass.
    fn tick_until(&mut self, depth: u16, state: FillState, limit: usize) {
        for _ in 0..limit {
            if self.svc.state() == state {
                return;
            }
            self.tick(depth);
        }
        panic!("never reached {:?} within {} ticks", state, limit);
    }
}

// ── Scenario: confirmed low starts the fill ──────────────────

#[test]
fn four_low_reads_do_nothing() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 4);
    assert_eq!(h.svc.state(), FillState::Off);
    assert!(h.rig.calls.is_empty(), "no valve command before debounce");
}

#[test]
fn fifth_low_read_opens_feed_then_output() {
    let mut h = Harness::new(test_config());
    let now_before = h.clock.now + 4000; // now at the 5th tick's start

    h.tick_n(LOW, 5);

    assert_eq!(h.svc.state(), FillState::On);
    assert_eq!(
        h.rig.calls,
        vec![ValveCall::Feed(true), ValveCall::Output(true)],
        "feed valves must open before the output valves"
    );
    assert_eq!(h.clock.waits, vec![50], "priming wait between the two groups");
    assert_eq!(h.sink.state_changes(), vec![(FillState::Off, FillState::On)]);

    // ElapsedOnTime is exactly zero at the moment of the transition.
    assert_eq!(h.svc.diagnostics(now_before).elapsed_on_ms, 0);
}

#[test]
fn noisy_low_readings_never_start_a_fill() {
    let mut h = Harness::new(test_config());
    // 4 lows, a nominal spike, 4 lows, a full spike — never 5 in a row.
    for _ in 0..5 {
        h.tick_n(LOW, 4);
        h.tick(NOMINAL);
        h.tick_n(LOW, 4);
        h.tick(FULL);
    }
    assert_eq!(h.svc.state(), FillState::Off);
    assert!(h.rig.calls.is_empty());
}

// ── Scenario: full stops the fill (after the hold) ───────────

#[test]
fn full_closes_output_then_feed_after_the_hold() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    assert_eq!(h.svc.state(), FillState::On);
    h.rig.calls.clear();
    h.clock.waits.clear();

    // Full is confirmed after 5 reads, but the 12 s post-transition hold
    // keeps the water on.
    h.tick_n(FULL, 5);
    assert_eq!(h.svc.state(), FillState::On, "hold must suppress the stop");
    assert!(
        h.sink
            .events
            .iter()
            .any(|e| matches!(e, FillEvent::LevelChanged(Level::Full))),
        "the confirmed level change is still observable"
    );

    h.tick_until(FULL, FillState::Off, 20);
    assert_eq!(
        h.rig.calls,
        vec![ValveCall::Output(false), ValveCall::Feed(false)],
        "output valves must close before the feed valves"
    );
    assert_eq!(h.clock.waits, vec![70], "drain wait between the two groups");

    // Elapsed on-time is gone once the fill ends.
    assert_eq!(h.svc.diagnostics(h.clock.now).elapsed_on_ms, 0);
}

#[test]
fn elapsed_resets_to_zero_on_each_new_fill() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    h.tick_until(FULL, FillState::Off, 25);

    // Hold after Off, then a fresh confirmed Low starts a second fill.
    h.tick_n(NOMINAL, 13);
    let now_at_refill = h.clock.now + 4000;
    h.tick_n(LOW, 5);
    assert_eq!(h.svc.state(), FillState::On);
    assert_eq!(h.svc.diagnostics(now_at_refill).elapsed_on_ms, 0);
}

#[test]
fn elapsed_strictly_increases_while_on() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);

    let mut last = h.svc.diagnostics(h.clock.now).elapsed_on_ms;
    for _ in 0..5 {
        h.tick(LOW);
        let next = h.svc.diagnostics(h.clock.now).elapsed_on_ms;
        assert!(next > last, "elapsed must strictly increase while On");
        last = next;
    }
}

// ── Scenario: the fail-safe ceiling ──────────────────────────

#[test]
fn stuck_low_sensor_trips_the_ceiling() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    assert_eq!(h.svc.state(), FillState::On);
    h.rig.calls.clear();

    // The sensor never reports full. 60 s of on-time later the very next
    // tick must shut down for good.
    h.tick_until(LOW, FillState::FailedShutdown, 80);

    assert_eq!(
        h.rig.calls,
        vec![ValveCall::Output(false), ValveCall::Feed(false)],
        "the trip itself closes the valves"
    );
    assert!(
        h.sink
            .events
            .iter()
            .any(|e| matches!(e, FillEvent::FailSafeTripped { .. })),
    );
}

#[test]
fn failed_shutdown_ignores_all_level_readings() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    h.tick_until(LOW, FillState::FailedShutdown, 80);
    let calls_at_trip = h.rig.calls.len();

    // Even a tank that now reads full — or low again — changes nothing.
    h.tick_n(FULL, 20);
    h.tick_n(LOW, 20);
    h.tick_n(NOMINAL, 20);

    assert_eq!(h.svc.state(), FillState::FailedShutdown);
    assert_eq!(
        h.rig.calls.len(),
        calls_at_trip,
        "no valve command may be issued after the trip"
    );
}

#[test]
fn diagnostics_keep_reporting_after_the_trip() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    h.tick_until(LOW, FillState::FailedShutdown, 80);

    let d1 = h.svc.diagnostics(h.clock.now);
    assert_eq!(d1.state, FillState::FailedShutdown);
    assert!(d1.fail_safe_tripped);
    assert!(d1.elapsed_on_ms >= 60_000, "frozen on-time explains the trip");

    h.tick_n(FULL, 10);
    let d2 = h.svc.diagnostics(h.clock.now);
    assert_eq!(
        d2.elapsed_on_ms, d1.elapsed_on_ms,
        "frozen on-time must not drift"
    );
}

#[test]
fn reset_is_reconstruction_and_fully_rearms() {
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    h.tick_until(LOW, FillState::FailedShutdown, 80);

    // A board reset rebuilds the whole controller.
    let mut h = Harness::new(test_config());
    assert_eq!(h.svc.state(), FillState::Off);
    assert_eq!(h.svc.diagnostics(h.clock.now).elapsed_on_ms, 0);
    assert!(!h.svc.diagnostics(h.clock.now).fail_safe_tripped);

    h.tick_n(LOW, 5);
    assert_eq!(h.svc.state(), FillState::On, "normal operation resumes");
    assert_eq!(
        h.rig.calls,
        vec![ValveCall::Feed(true), ValveCall::Output(true)]
    );
}

// ── Scenario: actuator failure ───────────────────────────────

#[test]
fn feed_valve_fault_escalates_to_failed_shutdown() {
    let mut h = Harness::new(test_config());
    h.rig.fail_feed = true;

    h.tick_n(LOW, 5);

    assert_eq!(h.svc.state(), FillState::FailedShutdown);
    assert!(
        h.sink
            .events
            .iter()
            .any(|e| matches!(e, FillEvent::ValveFault(ValveError::GpioWriteFailed))),
    );
    // Best-effort close still drives the group that answers.
    assert_eq!(h.rig.calls, vec![ValveCall::Output(false)]);
    assert!(
        !h.rig.calls.contains(&ValveCall::Output(true)),
        "a failed open sequence must never energise the output valves"
    );

    // And it stays down, with no retry.
    let calls = h.rig.calls.len();
    h.tick_n(LOW, 10);
    assert_eq!(h.svc.state(), FillState::FailedShutdown);
    assert_eq!(h.rig.calls.len(), calls);
}

#[test]
fn output_valve_fault_during_open_escalates_too() {
    let mut h = Harness::new(test_config());
    h.rig.fail_output = true;

    h.tick_n(LOW, 5);

    assert_eq!(h.svc.state(), FillState::FailedShutdown);
    // Feed opened, output failed, best-effort shut the feed again.
    assert_eq!(
        h.rig.calls,
        vec![ValveCall::Feed(true), ValveCall::Feed(false)]
    );
}

// ── Startup edge cases ───────────────────────────────────────

#[test]
fn establishment_emits_no_level_change_event() {
    let mut h = Harness::new(test_config());
    h.tick_n(NOMINAL, 5);
    assert!(
        !h.sink
            .events
            .iter()
            .any(|e| matches!(e, FillEvent::LevelChanged(_))),
        "the initial confirmed level is an establishment, not a change"
    );
    assert_eq!(h.svc.state(), FillState::Off);
}

#[test]
fn fresh_controller_has_no_hold_window() {
    // A freshly reset controller over a low tank must start filling as
    // soon as the level is confirmed — the hold only follows transitions.
    let mut h = Harness::new(test_config());
    h.tick_n(LOW, 5);
    assert_eq!(h.svc.state(), FillState::On);
}

#[test]
fn rejects_invalid_config_at_construction() {
    let bad = FillConfig {
        max_on_time_secs: 10,
        min_hold_secs: 12,
        ..test_config()
    };
    assert!(FillService::new(bad).is_err());
}
