//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the button sampler, the attempt FSM, and the live
//! settings.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!    InputPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │ ──▶ NotifyPort
//!  ActuatorPort ◀──│  sampler · FSM · config │
//!                  └────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::Settings;
use crate::drivers::button::ButtonSampler;
use crate::fsm::{AttemptFsm, AttemptOutcome, AttemptState, FsmEvent};

use super::commands::AppCommand;
use super::events::{AppEvent, OpenTrigger};
use super::ports::{ActuatorPort, EventSink, InputPort, NotifyPort, SettingsPort};

/// Seconds a settings change may sit unsaved before the auto-save flushes.
const AUTO_SAVE_DELAY_SECS: f32 = 5.0;

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    sampler: ButtonSampler,
    fsm: AttemptFsm,
    settings: Settings,
    tick_count: u64,
    settings_dirty: bool,
    dirty_since_tick: u64,
}

impl AppService {
    /// Construct the service from loaded (already validated) settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            sampler: ButtonSampler::new(),
            fsm: AttemptFsm::new(),
            settings,
            tick_count: 0,
            settings_dirty: false,
            dirty_since_tick: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce startup through the sink.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "AppService started, secret length {} — {}",
            self.settings.secret.len(),
            self.settings.secret
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one polling tick: sample the button → advance the FSM → act on
    /// the outcome.  Call every `polling_interval_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`InputPort`] and
    /// [`ActuatorPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut (impl InputPort + ActuatorPort),
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        let level = hw.button_pressed();
        let edge = self.sampler.sample(level);

        match self.fsm.poll(edge, now_ms, &self.settings) {
            None => {}
            Some(FsmEvent::AttemptStarted) => sink.emit(&AppEvent::AttemptStarted),
            Some(FsmEvent::Press { kind, held_ms }) => {
                sink.emit(&AppEvent::PressRecorded { kind, held_ms });
            }
            Some(FsmEvent::Ended { outcome, entered }) => {
                sink.emit(&AppEvent::AttemptEnded { outcome, entered });
                if outcome == AttemptOutcome::GoodSequence {
                    self.open_door(OpenTrigger::Sequence, hw, notifier, sink);
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from the endpoint or serial console).
    ///
    /// Settings-mutating commands are assumed pre-validated by the caller;
    /// the storage adapter re-checks before anything hits flash.
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::OpenDoor => self.force_open(hw, notifier, sink),
            AppCommand::SetSecret(secret) => {
                info!("Secret changed: {} presses", secret.len());
                self.settings.secret = secret;
                self.mark_settings_dirty();
                sink.emit(&AppEvent::SettingsChanged);
            }
            AppCommand::UpdateSettings(update) => {
                update.apply_to(&mut self.settings);
                self.mark_settings_dirty();
                sink.emit(&AppEvent::SettingsChanged);
                info!("Settings updated at runtime");
            }
            AppCommand::SaveSettings => {
                self.dirty_since_tick = 0;
                self.mark_settings_dirty();
            }
        }
    }

    /// Open the door outside the sequence path.  Leaves the attempt FSM
    /// and its buffer untouched.
    pub fn force_open(
        &mut self,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        self.open_door(OpenTrigger::Command, hw, notifier, sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state.
    pub fn state(&self) -> AttemptState {
        self.fsm.state()
    }

    /// True while an attempt is in progress (drives the indicator).
    pub fn attempt_live(&self) -> bool {
        self.fsm.attempt_live()
    }

    /// Live settings (for endpoint read-back or delta updates).
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Total polling ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn open_door(
        &mut self,
        trigger: OpenTrigger,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        hw.open_latch(self.settings.timing.actuation_hold_ms);
        sink.emit(&AppEvent::DoorOpened { trigger });

        let enabled = match trigger {
            OpenTrigger::Sequence => self.settings.notify_on_sequence,
            OpenTrigger::Command => self.settings.notify_on_command,
        };
        if enabled {
            if let Err(e) = notifier.notify(trigger) {
                warn!("Notification delivery failed: {}", e);
            }
        }
    }

    // ── Settings dirty-flag management ────────────────────────

    /// Mark the settings as modified.
    pub fn mark_settings_dirty(&mut self) {
        if !self.settings_dirty {
            self.settings_dirty = true;
            self.dirty_since_tick = self.tick_count;
        }
    }

    /// Check if auto-save should trigger (5 seconds after last change).
    /// Returns `true` if the settings were saved.
    pub fn auto_save_if_needed(&mut self, storage: &impl SettingsPort) -> bool {
        if !self.settings_dirty {
            return false;
        }
        let ticks_since_dirty = self.tick_count.saturating_sub(self.dirty_since_tick);
        let secs_since_dirty =
            ticks_since_dirty as f32 * (self.settings.timing.polling_interval_ms as f32 / 1000.0);
        if secs_since_dirty < AUTO_SAVE_DELAY_SECS {
            return false;
        }
        match storage.save(&self.settings) {
            Ok(()) => {
                self.settings_dirty = false;
                info!("Settings auto-saved to NVS");
                true
            }
            Err(e) => {
                warn!("Settings auto-save failed: {}", e);
                false
            }
        }
    }

    /// Force-save if dirty (endpoint mutations call this immediately).
    pub fn force_save_if_dirty(&mut self, storage: &impl SettingsPort) -> bool {
        if !self.settings_dirty {
            return true;
        }
        match storage.save(&self.settings) {
            Ok(()) => {
                self.settings_dirty = false;
                info!("Settings saved to NVS");
                true
            }
            Err(e) => {
                warn!("Settings save failed: {}", e);
                false
            }
        }
    }

    /// Whether the settings have unsaved changes.
    pub fn is_settings_dirty(&self) -> bool {
        self.settings_dirty
    }
}
