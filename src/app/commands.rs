//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (the command
//! endpoint, serial console) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

use crate::config::Settings;
use crate::sequence::SecretSequence;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Open the door now, bypassing the sequence FSM entirely.
    OpenDoor,

    /// Replace the secret sequence.
    SetSecret(SecretSequence),

    /// Apply a partial settings update (validated by the caller).
    UpdateSettings(SettingsUpdate),

    /// Explicitly persist the current settings on the next save check.
    SaveSettings,
}

/// A sparse settings delta — only the provided fields change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub polling_interval_ms: Option<u32>,
    pub short_press_ceiling_ms: Option<u32>,
    pub release_timeout_ms: Option<u32>,
    pub inter_press_timeout_ms: Option<u32>,
    pub inter_press_gap_ms: Option<u32>,
    pub actuation_hold_ms: Option<u32>,
    pub notify_on_sequence: Option<bool>,
    pub notify_on_command: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the provided fields into `settings`, leaving the rest alone.
    pub fn apply_to(&self, settings: &mut Settings) {
        let t = &mut settings.timing;
        if let Some(v) = self.polling_interval_ms {
            t.polling_interval_ms = v;
        }
        if let Some(v) = self.short_press_ceiling_ms {
            t.short_press_ceiling_ms = v;
        }
        if let Some(v) = self.release_timeout_ms {
            t.release_timeout_ms = v;
        }
        if let Some(v) = self.inter_press_timeout_ms {
            t.inter_press_timeout_ms = v;
        }
        if let Some(v) = self.inter_press_gap_ms {
            t.inter_press_gap_ms = v;
        }
        if let Some(v) = self.actuation_hold_ms {
            t.actuation_hold_ms = v;
        }
        if let Some(v) = self.notify_on_sequence {
            settings.notify_on_sequence = v;
        }
        if let Some(v) = self.notify_on_command {
            settings.notify_on_command = v;
        }
    }
}
