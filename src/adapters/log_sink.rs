//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! A future MQTT or display adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::fsm::AttemptOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | waiting for a sequence");
            }
            AppEvent::AttemptStarted => {
                info!("SEQ | attempt started");
            }
            AppEvent::PressRecorded { kind, held_ms } => {
                info!("SEQ | {} press ({}ms)", kind, held_ms);
            }
            AppEvent::AttemptEnded { outcome, entered } => match outcome {
                AttemptOutcome::GoodSequence => {
                    info!("SEQ | VALID sequence entered: {}", entered);
                }
                AttemptOutcome::BadSequence => {
                    info!("SEQ | INVALID sequence entered: {}", entered);
                }
                AttemptOutcome::Timeout => {
                    info!("SEQ | timeout after {} presses, reset", entered.len());
                }
            },
            AppEvent::DoorOpened { trigger } => {
                info!("DOOR | opened ({:?})", trigger);
            }
            AppEvent::SettingsChanged => {
                info!("CFG | settings changed at runtime");
            }
        }
    }
}
