//! Secret sequence and attempt-buffer types.
//!
//! A sequence is an ordered run of SHORT/LONG press symbols, capped at
//! [`MAX_SEQUENCE_LEN`].  The secret is owned by configuration; the attempt
//! buffer is owned by the FSM and checked as a prefix of the secret after
//! every append.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Hard ceiling on secret length, and therefore on attempt length.
pub const MAX_SEQUENCE_LEN: usize = 50;

/// One classified button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressKind {
    Short,
    Long,
}

impl PressKind {
    /// Single-letter wire form used by the command endpoint (`S` / `L`).
    pub fn letter(self) -> char {
        match self {
            Self::Short => 'S',
            Self::Long => 'L',
        }
    }

    /// Parses the wire letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'S' | 's' => Some(Self::Short),
            'L' | 'l' => Some(Self::Long),
            _ => None,
        }
    }
}

impl fmt::Display for PressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "SHORT"),
            Self::Long => write!(f, "LONG"),
        }
    }
}

/// Rejected secret input at the configuration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceParseError {
    /// Empty input — a secret must contain at least one press.
    Empty,
    /// More than [`MAX_SEQUENCE_LEN`] symbols.
    TooLong,
    /// A character other than `S`/`L`.
    InvalidChar(char),
}

impl fmt::Display for SequenceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "wrong length"),
            Self::TooLong => write!(f, "sequence exceeds {MAX_SEQUENCE_LEN} presses"),
            Self::InvalidChar(c) => write!(f, "wrong char '{c}'"),
        }
    }
}

fn fmt_kinds(f: &mut fmt::Formatter<'_>, kinds: &[PressKind]) -> fmt::Result {
    write!(f, "[ ")?;
    for (i, kind) in kinds.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{kind}")?;
    }
    write!(f, " ]")
}

/// The stored secret: the run of presses that unlocks the door.
///
/// Construction is validating — overlong input is rejected, never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretSequence {
    kinds: heapless::Vec<PressKind, MAX_SEQUENCE_LEN>,
}

impl SecretSequence {
    /// Parses an `S`/`L` string as supplied by the command endpoint.
    pub fn parse(input: &str) -> Result<Self, SequenceParseError> {
        if input.is_empty() {
            return Err(SequenceParseError::Empty);
        }
        let mut kinds = heapless::Vec::new();
        for c in input.chars() {
            let kind = PressKind::from_letter(c).ok_or(SequenceParseError::InvalidChar(c))?;
            kinds.push(kind).map_err(|_| SequenceParseError::TooLong)?;
        }
        Ok(Self { kinds })
    }

    /// Builds a secret from already-classified symbols.
    pub fn from_kinds(kinds: &[PressKind]) -> Result<Self, SequenceParseError> {
        let kinds =
            heapless::Vec::from_slice(kinds).map_err(|()| SequenceParseError::TooLong)?;
        Ok(Self { kinds })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<PressKind> {
        self.kinds.get(index).copied()
    }

    pub fn as_slice(&self) -> &[PressKind] {
        &self.kinds
    }

    /// Wire form for read-back, e.g. `SSSSLL`.
    pub fn as_letters(&self) -> heapless::String<MAX_SEQUENCE_LEN> {
        let mut s = heapless::String::new();
        for kind in &self.kinds {
            let _ = s.push(kind.letter());
        }
        s
    }
}

impl Default for SecretSequence {
    /// Factory code: four short presses followed by two long ones.
    fn default() -> Self {
        use PressKind::{Long, Short};
        let mut kinds = heapless::Vec::new();
        for kind in [Short, Short, Short, Short, Long, Long] {
            let _ = kinds.push(kind);
        }
        Self { kinds }
    }
}

impl fmt::Display for SecretSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_kinds(f, &self.kinds)
    }
}

/// Prefix check result after an append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Valid prefix, shorter than the secret.
    Partial,
    /// Valid prefix of equal length — structurally complete.
    Complete,
    /// The buffer is not a prefix of the secret.
    Mismatch,
}

/// Presses accumulated during the current attempt.
///
/// Append-then-validate: a mismatching symbol is still recorded before the
/// verdict reports it, so logs show exactly what was entered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttemptBuffer {
    kinds: heapless::Vec<PressKind, MAX_SEQUENCE_LEN>,
}

impl AttemptBuffer {
    pub fn new() -> Self {
        Self {
            kinds: heapless::Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn as_slice(&self) -> &[PressKind] {
        &self.kinds
    }

    /// Appends a symbol and reports the resulting prefix verdict.
    ///
    /// An append that would exceed the secret length (or the buffer
    /// capacity) is a mismatch by definition.
    pub fn append_checked(&mut self, kind: PressKind, secret: &SecretSequence) -> Verdict {
        if self.kinds.len() >= secret.len() || self.kinds.push(kind).is_err() {
            return Verdict::Mismatch;
        }
        self.verdict(secret)
    }

    /// Element-wise prefix check of the whole buffer against the secret.
    pub fn verdict(&self, secret: &SecretSequence) -> Verdict {
        if self.kinds.len() > secret.len() {
            return Verdict::Mismatch;
        }
        for (i, kind) in self.kinds.iter().enumerate() {
            if secret.get(i) != Some(*kind) {
                return Verdict::Mismatch;
            }
        }
        if self.kinds.len() == secret.len() {
            Verdict::Complete
        } else {
            Verdict::Partial
        }
    }

    /// Empties the buffer.  Idempotent, callable in any state.
    pub fn reset(&mut self) {
        self.kinds.clear();
    }
}

impl fmt::Display for AttemptBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_kinds(f, &self.kinds)
    }
}
