//! Status LED driver.
//!
//! One LEDC PWM channel dims the on-board LED.  The LED is wired
//! active-low, so the register duty is the inverse of the requested
//! brightness.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC channel via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct StatusLed {
    current: u8,
}

impl StatusLed {
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Set brightness (0 = dark, 255 = full).  Inversion for the
    /// active-low wiring happens here, nowhere else.
    pub fn set_brightness(&mut self, duty: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_STATUS, 255 - duty);
        self.current = duty;
    }

    pub fn off(&mut self) {
        self.set_brightness(0);
    }

    pub fn current_brightness(&self) -> u8 {
        self.current
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
