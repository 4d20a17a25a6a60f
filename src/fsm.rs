//! Attempt state machine for the secret press sequence.
//!
//! One attempt runs from the first press out of `Idle` to a terminal
//! outcome.  Terminal labels are resolved on the tick that reaches them:
//! the buffer is cleared and the machine is back in `Idle` before the tick
//! returns.
//!
//! ```text
//!           press                release ≤ timeout
//!   Idle ─────────▶ WaitingRelease ─────────▶ CheckingSequence
//!     ▲                  │                      │ Partial   → WaitingNextPress ─┐
//!     │                  │ held too long        │ Complete  → settle → GOOD     │ press
//!     │                  ▼                      │ Mismatch  → BAD               │
//!     ├───────────── TIMEOUT ◀── gap expired ◀──┴──────────────────────────────┘
//!     └── GOOD / BAD / TIMEOUT all reset the buffer and land here
//! ```
//!
//! The machine advances at most one state transition per polling tick and
//! snapshots the secret and timing when an attempt starts, so settings
//! changes apply from the next `Idle` entry.

use log::debug;

use crate::config::{Settings, TimingConfig};
use crate::drivers::button::ButtonEdge;
use crate::sequence::{AttemptBuffer, PressKind, SecretSequence, Verdict};

/// Current phase of the attempt.  Each variant carries only the data that
/// is meaningful in that phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    /// No attempt in progress.
    Idle,
    /// Button is down; waiting for the release that classifies the press.
    WaitingRelease { pressed_at: u64 },
    /// A press was appended; the verdict routes the next transition.  A
    /// `Complete` verdict parks here provisionally until the settle gap
    /// elapses, measured from `released_at`.
    CheckingSequence { released_at: u64, verdict: Verdict },
    /// Prefix is valid and incomplete; waiting for the next press.
    WaitingNextPress { released_at: u64 },
}

/// The three ways an attempt can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Held too long, or the gap to the next press expired.
    Timeout,
    /// The entered presses stopped being a prefix of the secret.
    BadSequence,
    /// The secret was replayed exactly and the settle gap passed.
    GoodSequence,
}

/// What one polling tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FsmEvent {
    /// First press of a new attempt was observed.
    AttemptStarted,
    /// A press was released in time and classified.
    Press { kind: PressKind, held_ms: u64 },
    /// The attempt ended; `entered` is the buffer at that moment.
    Ended {
        outcome: AttemptOutcome,
        entered: AttemptBuffer,
    },
}

/// SHORT strictly below the ceiling, LONG at or above it.
fn classify(held_ms: u64, timing: &TimingConfig) -> PressKind {
    if held_ms < u64::from(timing.short_press_ceiling_ms) {
        PressKind::Short
    } else {
        PressKind::Long
    }
}

/// Sequence FSM.  Owns the attempt buffer and the per-attempt snapshot of
/// secret and timing; nothing else mutates either.
pub struct AttemptFsm {
    state: AttemptState,
    buffer: AttemptBuffer,
    secret: SecretSequence,
    timing: TimingConfig,
}

impl AttemptFsm {
    pub fn new() -> Self {
        Self {
            state: AttemptState::Idle,
            buffer: AttemptBuffer::new(),
            secret: SecretSequence::default(),
            timing: TimingConfig::default(),
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// True from the first press until the attempt resolves.
    pub fn attempt_live(&self) -> bool {
        self.state != AttemptState::Idle
    }

    pub fn buffer(&self) -> &AttemptBuffer {
        &self.buffer
    }

    /// Advances the machine by one polling tick.
    ///
    /// `edge` is the button transition observed this tick, if any; `now_ms`
    /// is monotonic.  `settings` is only read when an attempt starts.
    pub fn poll(
        &mut self,
        edge: Option<ButtonEdge>,
        now_ms: u64,
        settings: &Settings,
    ) -> Option<FsmEvent> {
        match self.state {
            AttemptState::Idle => {
                if edge == Some(ButtonEdge::Pressed) {
                    self.secret = settings.secret.clone();
                    self.timing = settings.timing;
                    self.buffer.reset();
                    self.state = AttemptState::WaitingRelease { pressed_at: now_ms };
                    return Some(FsmEvent::AttemptStarted);
                }
                None
            }

            AttemptState::WaitingRelease { pressed_at } => {
                let held_ms = now_ms.saturating_sub(pressed_at);
                let release_timeout = u64::from(self.timing.release_timeout_ms);

                if edge == Some(ButtonEdge::Released) {
                    if held_ms > release_timeout {
                        return self.finish(AttemptOutcome::Timeout);
                    }
                    let kind = classify(held_ms, &self.timing);
                    let verdict = self.buffer.append_checked(kind, &self.secret);
                    self.state = AttemptState::CheckingSequence {
                        released_at: now_ms,
                        verdict,
                    };
                    return Some(FsmEvent::Press { kind, held_ms });
                }

                // Still held: time out once the release window is blown.
                if held_ms > release_timeout {
                    return self.finish(AttemptOutcome::Timeout);
                }
                None
            }

            AttemptState::CheckingSequence {
                released_at,
                verdict,
            } => match verdict {
                Verdict::Mismatch => self.finish(AttemptOutcome::BadSequence),

                Verdict::Partial => {
                    // A press landing on the verdict tick continues the
                    // attempt without parking in WaitingNextPress first.
                    if edge == Some(ButtonEdge::Pressed) {
                        self.state = AttemptState::WaitingRelease { pressed_at: now_ms };
                    } else {
                        self.state = AttemptState::WaitingNextPress { released_at };
                    }
                    None
                }

                Verdict::Complete => {
                    if edge == Some(ButtonEdge::Pressed) {
                        // The sequence only looked complete; this press
                        // extends it past the secret and will mismatch.
                        self.state = AttemptState::WaitingRelease { pressed_at: now_ms };
                        return None;
                    }
                    let settled = now_ms.saturating_sub(released_at)
                        >= u64::from(self.timing.inter_press_gap_ms);
                    if settled {
                        return self.finish(AttemptOutcome::GoodSequence);
                    }
                    None
                }
            },

            AttemptState::WaitingNextPress { released_at } => {
                let idle_ms = now_ms.saturating_sub(released_at);

                // The gap check wins over a press arriving on the same tick.
                if idle_ms > u64::from(self.timing.inter_press_timeout_ms) {
                    return self.finish(AttemptOutcome::Timeout);
                }
                if edge == Some(ButtonEdge::Pressed) {
                    self.state = AttemptState::WaitingRelease { pressed_at: now_ms };
                }
                None
            }
        }
    }

    /// Terminal transition: capture the entered presses, clear the buffer,
    /// return to `Idle` — all within the current tick.
    fn finish(&mut self, outcome: AttemptOutcome) -> Option<FsmEvent> {
        debug!("FSM | attempt ended: {:?} after {}", outcome, self.buffer);
        let entered = self.buffer.clone();
        self.buffer.reset();
        self.state = AttemptState::Idle;
        Some(FsmEvent::Ended { outcome, entered })
    }
}

impl Default for AttemptFsm {
    fn default() -> Self {
        Self::new()
    }
}
