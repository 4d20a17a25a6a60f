//! Unified error type for the RingRing firmware.
//!
//! Every fallible subsystem converts into one `Error` enum so the boot
//! path in `main()` handles failures uniformly.  Variants stay thin:
//! the underlying typed errors carry the detail.

use core::fmt;

use crate::app::ports::{NotifyError, SettingsError};
use crate::drivers::hw_init::HwInitError;

/// Top-level firmware error.
#[derive(Debug)]
pub enum Error {
    /// Peripheral initialisation failed.
    Hw(HwInitError),
    /// Settings could not be loaded or persisted.
    Settings(SettingsError),
    /// Notification delivery failed.
    Notify(NotifyError),
    /// Anything else that can only go wrong at boot.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hw(e) => write!(f, "hardware: {e}"),
            Self::Settings(e) => write!(f, "settings: {e}"),
            Self::Notify(e) => write!(f, "notify: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Hw(e)
    }
}

impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Self::Settings(e)
    }
}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Self::Notify(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
