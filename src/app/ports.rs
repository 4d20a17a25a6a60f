//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (button input, latch relay, event sinks, storage,
//! notification) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the domain core never touches hardware directly.
//!
//! ## Security notes
//!
//! - **SettingsPort** implementations MUST validate before persisting.
//! - All port errors are typed — callers must handle every variant explicitly.

use crate::config::Settings;

use super::events::OpenTrigger;

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples the door button through this.
pub trait InputPort {
    /// Instantaneous logical level of the button (`true` = pressed).
    fn button_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain commands the door hardware through this.
pub trait ActuatorPort {
    /// Energise the latch relay, hold for `hold_ms`, release.  Blocking
    /// for the duration of the hold.
    fn open_latch(&mut self, hold_ms: u32);

    /// Set the status indicator brightness (0–255 duty).
    fn set_indicator(&mut self, duty: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, chat
/// relay, test recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Settings port (driven adapter: domain ↔ persistent settings)
// ───────────────────────────────────────────────────────────────

/// Loads and persists device settings.
///
/// # Security
///
/// Implementations MUST validate settings before persisting.  Invalid
/// values should be rejected with [`SettingsError::ValidationFailed`],
/// not silently clamped — a compromised command channel must not be able
/// to wedge the press classifier with a ceiling above the release timeout.
pub trait SettingsPort {
    /// Load settings from persistent storage.
    /// Returns [`SettingsError::NotFound`] on a blank device.
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Validate and persist settings.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Notification port (driven adapter: domain → messaging)
// ───────────────────────────────────────────────────────────────

/// Best-effort delivery of a door-opened announcement.
///
/// Failures must be swallowed by the caller after logging — notification
/// never rolls back an actuation or disturbs the attempt FSM.
pub trait NotifyPort {
    fn notify(&mut self, trigger: OpenTrigger) -> Result<(), NotifyError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SettingsPort`] operations.
#[derive(Debug)]
pub enum SettingsError {
    /// No settings found in storage (first boot).
    NotFound,
    /// Stored settings failed integrity / deserialization check.
    Corrupted,
    /// A settings field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from [`NotifyPort`] operations.
#[derive(Debug)]
pub enum NotifyError {
    /// No delivery channel is configured on this build.
    NotConfigured,
    /// The transport reported a failure.
    SendFailed,
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "settings not found"),
            Self::Corrupted => write!(f, "settings corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "no notification channel configured"),
            Self::SendFailed => write!(f, "notification send failed"),
        }
    }
}
