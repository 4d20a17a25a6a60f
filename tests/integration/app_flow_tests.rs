//! Integration tests for the AppService → FSM → actuator pipeline.
//!
//! These run on the host (x86_64) and drive the full polling chain —
//! button level sampling, press classification, sequence validation,
//! latch actuation — through mock adapters at the default 50 ms cadence.

use crate::mock_ports::{ActuatorCall, MemStore, MockHardware, MockNotifier, RecordingSink};

use ringring::app::events::{AppEvent, OpenTrigger};
use ringring::app::ports::ActuatorPort;
use ringring::app::service::AppService;
use ringring::config::Settings;
use ringring::fsm::{AttemptOutcome, AttemptState};
use ringring::sequence::PressKind;

const TICK_MS: u64 = 50;

/// Drives an AppService with scripted button levels, one tick at a time.
struct Harness {
    app: AppService,
    hw: MockHardware,
    notifier: MockNotifier,
    sink: RecordingSink,
    now_ms: u64,
}

impl Harness {
    fn new(settings: Settings) -> Self {
        let mut app = AppService::new(settings);
        let mut sink = RecordingSink::new();
        app.start(&mut sink);
        Self {
            app,
            hw: MockHardware::new(),
            notifier: MockNotifier::new(),
            sink,
            now_ms: 0,
        }
    }

    /// One polling tick with the button at the given level.
    fn step(&mut self, pressed: bool) {
        self.hw.pressed = pressed;
        self.app
            .poll(self.now_ms, &mut self.hw, &mut self.notifier, &mut self.sink);
        self.now_ms += TICK_MS;
    }

    /// Press for `hold_ms`, release, plus one quiet tick so the verdict
    /// resolves before the next press.
    fn tap(&mut self, hold_ms: u64) {
        for _ in 0..(hold_ms / TICK_MS).max(1) {
            self.step(true);
        }
        self.step(false);
        self.step(false);
    }

    fn idle_ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.step(false);
        }
    }

    fn ended_outcomes(&self) -> Vec<AttemptOutcome> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::AttemptEnded { outcome, .. } => Some(*outcome),
                _ => None,
            })
            .collect()
    }
}

// ── Full success trace → exactly one actuation ───────────────

#[test]
fn replaying_the_secret_opens_the_door_once() {
    let mut h = Harness::new(Settings::default()); // secret SSSSLL

    for _ in 0..4 {
        h.tap(100); // short
    }
    for _ in 0..2 {
        h.tap(500); // long
    }
    // Settle gap: a second of silence turns Complete into GoodSequence.
    h.idle_ticks(25);

    assert_eq!(h.ended_outcomes(), vec![AttemptOutcome::GoodSequence]);
    assert_eq!(h.hw.latch_opens(), 1);
    assert!(h
        .sink
        .events
        .contains(&AppEvent::DoorOpened {
            trigger: OpenTrigger::Sequence
        }));
    // Six presses were recorded on the way.
    let presses = h
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::PressRecorded { .. }))
        .count();
    assert_eq!(presses, 6);
    // Sequence-triggered notification is off by default.
    assert!(h.notifier.deliveries.is_empty());
    assert!(!h.app.attempt_live());
}

// ── Mismatch at symbol k → BadSequence, no actuation ─────────

#[test]
fn diverging_press_fails_the_attempt_at_that_symbol() {
    let mut h = Harness::new(Settings::default());

    h.tap(100);
    h.tap(100);
    h.tap(500); // secret wants a third SHORT; this LONG diverges

    assert_eq!(h.ended_outcomes(), vec![AttemptOutcome::BadSequence]);
    assert_eq!(h.hw.latch_opens(), 0);

    // The offending symbol is part of the recorded attempt.
    let entered = h
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::AttemptEnded { entered, .. } => Some(entered.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(
        entered.as_slice(),
        &[PressKind::Short, PressKind::Short, PressKind::Long]
    );
}

// ── Held past the release window → Timeout ───────────────────

#[test]
fn holding_the_button_too_long_times_out() {
    let mut h = Harness::new(Settings::default());

    // 18 pressed ticks reach 850 ms held — past the 800 ms window.
    for _ in 0..18 {
        h.step(true);
    }
    h.step(false);
    h.idle_ticks(2);

    assert_eq!(h.ended_outcomes(), vec![AttemptOutcome::Timeout]);
    assert_eq!(h.hw.latch_opens(), 0);
    assert_eq!(h.app.state(), AttemptState::Idle);
}

// ── Waiting too long between presses → Timeout ───────────────

#[test]
fn stalling_between_presses_times_out() {
    let mut h = Harness::new(Settings::default());

    h.tap(100);
    h.idle_ticks(20); // > 800 ms of silence while a next press is due

    assert_eq!(h.ended_outcomes(), vec![AttemptOutcome::Timeout]);
    assert_eq!(h.hw.latch_opens(), 0);

    let entered = h
        .sink
        .events
        .iter()
        .find_map(|e| match e {
            AppEvent::AttemptEnded { entered, .. } => Some(entered.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(entered.len(), 1);
}

// ── forceOpen during a live attempt leaves the attempt intact ─

#[test]
fn force_open_does_not_disturb_a_live_attempt() {
    let mut h = Harness::new(Settings::default());

    h.step(true); // attempt starts, button still down
    let state_before = h.app.state();
    assert!(matches!(state_before, AttemptState::WaitingRelease { .. }));

    h.app
        .force_open(&mut h.hw, &mut h.notifier, &mut h.sink);

    assert_eq!(h.hw.latch_opens(), 1);
    assert_eq!(h.app.state(), state_before);
    assert!(h.app.attempt_live());
    assert!(h
        .sink
        .events
        .contains(&AppEvent::DoorOpened {
            trigger: OpenTrigger::Command
        }));
    // Command-triggered notification is on by default.
    assert_eq!(h.notifier.deliveries, vec![OpenTrigger::Command]);
}

// ── Notification failure never blocks the door ───────────────

#[test]
fn failed_notification_does_not_affect_actuation() {
    let mut settings = Settings::default();
    settings.notify_on_sequence = true;
    let mut h = Harness::new(settings);
    h.notifier = MockNotifier::failing();

    for _ in 0..4 {
        h.tap(100);
    }
    for _ in 0..2 {
        h.tap(500);
    }
    h.idle_ticks(25);

    assert_eq!(h.ended_outcomes(), vec![AttemptOutcome::GoodSequence]);
    assert_eq!(h.hw.latch_opens(), 1);
    assert_eq!(h.notifier.deliveries, vec![OpenTrigger::Sequence]);
    assert_eq!(h.app.state(), AttemptState::Idle);
}

// ── Settings auto-save integrates with the tick clock ────────

#[test]
fn runtime_settings_change_is_auto_saved() {
    let mut h = Harness::new(Settings::default());
    let store = MemStore::empty();

    let update = ringring::app::commands::SettingsUpdate {
        inter_press_gap_ms: Some(1500),
        ..Default::default()
    };
    h.app.handle_command(
        ringring::app::commands::AppCommand::UpdateSettings(update),
        &mut h.hw,
        &mut h.notifier,
        &mut h.sink,
    );

    // Five seconds of quiet polling lets the debounce expire.
    h.idle_ticks(101);
    assert!(h.app.auto_save_if_needed(&store));
    assert_eq!(store.stored().unwrap().timing.inter_press_gap_ms, 1500);
    assert_eq!(store.save_count.get(), 1);
}

// ── Indicator duty flows through the actuator port ───────────

#[test]
fn indicator_calls_are_recorded_separately_from_latch_calls() {
    let mut h = Harness::new(Settings::default());
    h.hw.set_indicator(128);
    assert_eq!(h.hw.last_call(), Some(&ActuatorCall::SetIndicator { duty: 128 }));
    assert_eq!(h.hw.latch_opens(), 0);
}
