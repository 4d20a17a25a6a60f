//! Persistent device settings
//!
//! All tunable parameters for the RingRing door opener.
//! Values are persisted in NVS and can be changed at runtime through the
//! command endpoint.

use serde::{Deserialize, Serialize};

use crate::sequence::SecretSequence;

/// Timing knobs consumed by the press classifier and the attempt FSM.
///
/// All values are strictly positive milliseconds; `short_press_ceiling_ms`
/// must stay below `release_timeout_ms` so a press that is still inside the
/// release window can always be resolved as short or long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Button sampling cadence (milliseconds).
    pub polling_interval_ms: u32,
    /// Held strictly less than this → SHORT; at or above → LONG.
    pub short_press_ceiling_ms: u32,
    /// Longest accepted hold.  Held past this without release → timeout.
    pub release_timeout_ms: u32,
    /// Longest accepted idle gap while waiting for the next press.
    pub inter_press_timeout_ms: u32,
    /// Quiet time after a structurally complete sequence before it counts.
    pub inter_press_gap_ms: u32,
    /// How long the latch relay stays energised per opening.
    pub actuation_hold_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            polling_interval_ms: 50,
            short_press_ceiling_ms: 300,
            release_timeout_ms: 800,
            inter_press_timeout_ms: 800, // mirrors release_timeout until tuned apart
            inter_press_gap_ms: 1000,
            actuation_hold_ms: 1000,
        }
    }
}

/// Everything the device persists across reboots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // --- Press timing ---
    pub timing: TimingConfig,

    // --- Secret code ---
    pub secret: SecretSequence,

    // --- Notifications ---
    /// Announce door openings triggered by the secret code.
    pub notify_on_sequence: bool,
    /// Announce door openings triggered by the command endpoint.
    pub notify_on_command: bool,

    // --- Notification channel ---
    /// Telegram bot token; empty = notifications unconfigured.
    pub telegram_token: heapless::String<64>,
    /// Telegram chat to announce openings in.
    pub telegram_chat_id: heapless::String<24>,

    // --- Command endpoint credentials ---
    pub api_username: heapless::String<32>,
    /// SHA-256 digest of the endpoint password.
    pub api_password_sha256: [u8; 32],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            secret: SecretSequence::default(),
            notify_on_sequence: false,
            notify_on_command: true,
            telegram_token: heapless::String::new(),
            telegram_chat_id: heapless::String::new(),
            api_username: heapless::String::try_from("admin").unwrap_or_default(),
            api_password_sha256: hmac_sha256::Hash::hash(b"ringring"),
        }
    }
}

impl Settings {
    /// Boundary validation — storage and the command endpoint both refuse
    /// to apply settings that fail this.
    pub fn validate(&self) -> Result<(), &'static str> {
        let t = &self.timing;
        if t.polling_interval_ms == 0
            || t.short_press_ceiling_ms == 0
            || t.release_timeout_ms == 0
            || t.inter_press_timeout_ms == 0
            || t.inter_press_gap_ms == 0
            || t.actuation_hold_ms == 0
        {
            return Err("durations must be positive");
        }
        if t.short_press_ceiling_ms >= t.release_timeout_ms {
            return Err("short press ceiling must be below release timeout");
        }
        if self.api_username.is_empty() {
            return Err("api username must not be empty");
        }
        Ok(())
    }
}
