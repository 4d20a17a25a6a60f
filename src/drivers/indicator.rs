//! Status-LED pattern engine.
//!
//! Generates a time-varying brightness duty for the single status LED.
//! The main loop calls `tick()` each iteration and feeds the returned
//! duty into `StatusLed::set_brightness()`.
//!
//! ## Pattern types
//!
//! | Pattern  | Description                                  | Used for        |
//! |----------|----------------------------------------------|-----------------|
//! | Breathe  | Ramp 0→255→0 over a period, then hold off    | idle / waiting  |
//! | Blink    | On/off square wave                           | attempt live    |
//! | Off      | Dark                                         | —               |

/// Brightness envelope for the status LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPattern {
    /// Smooth ramp up and down over `period_ms`, then dark for
    /// `delay_after_ms` before the next cycle.
    Breathe { period_ms: u32, delay_after_ms: u32 },
    /// Square wave: full brightness for `on_ms`, dark for `off_ms`.
    Blink { on_ms: u32, off_ms: u32 },
    Off,
}

/// Slow breathe shown while the opener waits for a first press.
pub const PATTERN_IDLE: IndicatorPattern = IndicatorPattern::Breathe {
    period_ms: 1000,
    delay_after_ms: 2000,
};

/// Fast blink shown while a sequence attempt is in progress.
pub const PATTERN_ATTEMPT: IndicatorPattern = IndicatorPattern::Blink {
    on_ms: 100,
    off_ms: 100,
};

/// Pattern engine. Stack-allocated, no heap.
pub struct IndicatorEngine {
    phase_ms: u32,
    pattern: IndicatorPattern,
}

impl IndicatorEngine {
    pub fn new() -> Self {
        Self {
            phase_ms: 0,
            pattern: IndicatorPattern::Off,
        }
    }

    /// Switch patterns.  A genuine change restarts the phase so a blink
    /// always begins with its ON half; re-setting the same pattern is a
    /// no-op and keeps the animation smooth.
    pub fn set_pattern(&mut self, pattern: IndicatorPattern) {
        if self.pattern != pattern {
            self.pattern = pattern;
            self.phase_ms = 0;
        }
    }

    pub fn pattern(&self) -> IndicatorPattern {
        self.pattern
    }

    /// Advance the phase and return the current brightness duty.
    /// `delta_ms` is the time since the last call.
    pub fn tick(&mut self, delta_ms: u32) -> u8 {
        self.phase_ms = self.phase_ms.wrapping_add(delta_ms);

        match self.pattern {
            IndicatorPattern::Off => 0,
            IndicatorPattern::Blink { on_ms, off_ms } => {
                let cycle = on_ms + off_ms;
                if cycle == 0 {
                    return 0;
                }
                if (self.phase_ms % cycle) < on_ms { 255 } else { 0 }
            }
            IndicatorPattern::Breathe {
                period_ms,
                delay_after_ms,
            } => {
                let cycle = period_ms + delay_after_ms;
                if cycle == 0 {
                    return 0;
                }
                let pos = self.phase_ms % cycle;
                if pos < period_ms {
                    Self::ramp_brightness(pos, period_ms)
                } else {
                    0
                }
            }
        }
    }

    /// Sine-ish brightness curve without libm.
    /// Triangular approximation: ramps 0→255→0 over `period_ms`.
    fn ramp_brightness(pos_ms: u32, period_ms: u32) -> u8 {
        let pos = pos_ms as u64;
        let half = period_ms as u64 / 2;
        if half == 0 {
            return 0;
        }
        if pos < half {
            ((pos * 255) / half) as u8
        } else {
            (((period_ms as u64 - pos) * 255) / half) as u8
        }
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new()
    }
}
