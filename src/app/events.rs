//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, record in tests, etc.

use crate::fsm::AttemptOutcome;
use crate::sequence::{AttemptBuffer, PressKind};

/// What caused a door opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTrigger {
    /// The secret press sequence was replayed on the button.
    Sequence,
    /// The command endpoint requested it directly.
    Command,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started,

    /// The first press of a new attempt was observed.
    AttemptStarted,

    /// A press was released in time and classified.
    PressRecorded { kind: PressKind, held_ms: u64 },

    /// The attempt reached a terminal outcome; `entered` is what the
    /// visitor keyed in up to that point.
    AttemptEnded {
        outcome: AttemptOutcome,
        entered: AttemptBuffer,
    },

    /// The latch was pulsed.
    DoorOpened { trigger: OpenTrigger },

    /// Settings were changed at runtime (not yet necessarily persisted).
    SettingsChanged,
}
