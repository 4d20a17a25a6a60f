//! Mock port implementations for integration tests.
//!
//! Records every actuator and notification call so tests can assert on
//! the full command history without touching real GPIO/PWM registers.

use std::cell::{Cell, RefCell};

use ringring::app::events::{AppEvent, OpenTrigger};
use ringring::app::ports::{
    ActuatorPort, EventSink, InputPort, NotifyError, NotifyPort, SettingsError, SettingsPort,
};
use ringring::config::Settings;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    OpenLatch { hold_ms: u32 },
    SetIndicator { duty: u8 },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub pressed: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            pressed: false,
        }
    }

    pub fn latch_opens(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, ActuatorCall::OpenLatch { .. }))
            .count()
    }

    pub fn last_call(&self) -> Option<&ActuatorCall> {
        self.calls.last()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn button_pressed(&mut self) -> bool {
        self.pressed
    }
}

impl ActuatorPort for MockHardware {
    fn open_latch(&mut self, hold_ms: u32) {
        self.calls.push(ActuatorCall::OpenLatch { hold_ms });
    }

    fn set_indicator(&mut self, duty: u8) {
        self.calls.push(ActuatorCall::SetIndicator { duty });
    }
}

// ── MockNotifier ──────────────────────────────────────────────

pub struct MockNotifier {
    pub deliveries: Vec<OpenTrigger>,
    pub fail_sends: bool,
}

#[allow(dead_code)]
impl MockNotifier {
    pub fn new() -> Self {
        Self {
            deliveries: Vec::new(),
            fail_sends: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            deliveries: Vec::new(),
            fail_sends: true,
        }
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyPort for MockNotifier {
    fn notify(&mut self, trigger: OpenTrigger) -> Result<(), NotifyError> {
        self.deliveries.push(trigger);
        if self.fail_sends {
            Err(NotifyError::SendFailed)
        } else {
            Ok(())
        }
    }
}

// ── MemStore ──────────────────────────────────────────────────

pub struct MemStore {
    stored: RefCell<Option<Settings>>,
    pub save_count: Cell<usize>,
    pub fail_saves: Cell<bool>,
}

#[allow(dead_code)]
impl MemStore {
    pub fn empty() -> Self {
        Self {
            stored: RefCell::new(None),
            save_count: Cell::new(0),
            fail_saves: Cell::new(false),
        }
    }

    pub fn stored(&self) -> Option<Settings> {
        self.stored.borrow().clone()
    }
}

impl SettingsPort for MemStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        self.stored.borrow().clone().ok_or(SettingsError::NotFound)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate().map_err(SettingsError::ValidationFailed)?;
        if self.fail_saves.get() {
            return Err(SettingsError::IoError);
        }
        *self.stored.borrow_mut() = Some(settings.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn ended_events(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::AttemptEnded { .. }))
            .collect()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
