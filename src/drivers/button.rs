//! Level-sampling button driver with structural debounce.
//!
//! ## Hardware
//!
//! Active-low momentary doorbell switch with external pull-up.  The
//! hardware adapter reads the raw logical level; this driver turns level
//! samples into discrete press/release edges.
//!
//! ## Debounce
//!
//! Structural, not timed: at most one edge per level transition, and the
//! caller samples no faster than the configured polling interval, so
//! contact bounce shorter than one poll window never produces an edge.

/// Edge emitted when the sampled level differs from the previous sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEdge {
    Pressed,
    Released,
}

/// Compares each sample against the last observed level.
#[derive(Debug, Default)]
pub struct ButtonSampler {
    last_pressed: bool,
}

impl ButtonSampler {
    /// Starts with the button assumed released, as at power-on.
    pub fn new() -> Self {
        Self {
            last_pressed: false,
        }
    }

    /// Call once per polling tick with the instantaneous logical level
    /// (`true` = pressed).  The last observed level is updated on every
    /// call, edge or not.
    pub fn sample(&mut self, pressed: bool) -> Option<ButtonEdge> {
        let edge = match (self.last_pressed, pressed) {
            (false, true) => Some(ButtonEdge::Pressed),
            (true, false) => Some(ButtonEdge::Released),
            _ => None,
        };
        self.last_pressed = pressed;
        edge
    }

    /// Level seen on the most recent sample.
    pub fn is_pressed(&self) -> bool {
        self.last_pressed
    }
}
