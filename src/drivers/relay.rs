//! Door latch relay driver.
//!
//! Inverse logic: the relay input is pulled LOW to energise the electric
//! strike and HIGH at rest.  Opening the door is a single blocking pulse —
//! energise, hold, release — matching the deliberately synchronous
//! actuation section of the poll loop.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the relay GPIO via hw_init helpers.
//! On host/test: tracks pulse history in-memory only.

use std::time::Duration;

use log::info;

use crate::drivers::hw_init;
use crate::pins;

pub struct RelayDriver {
    pulse_count: u32,
    last_hold_ms: u32,
}

impl RelayDriver {
    /// The relay rests de-energised; hw_init drives the pin HIGH at boot.
    pub fn new() -> Self {
        Self {
            pulse_count: 0,
            last_hold_ms: 0,
        }
    }

    /// Energise the strike, hold for `hold_ms`, release.  Blocks the
    /// calling thread for the duration of the hold.
    pub fn pulse(&mut self, hold_ms: u32) {
        hw_init::gpio_write(pins::DOOR_RELAY_GPIO, false);
        std::thread::sleep(Duration::from_millis(u64::from(hold_ms)));
        hw_init::gpio_write(pins::DOOR_RELAY_GPIO, true);

        self.pulse_count = self.pulse_count.saturating_add(1);
        self.last_hold_ms = hold_ms;
        info!("Door opened ({}ms hold)", hold_ms);
    }

    pub fn pulse_count(&self) -> u32 {
        self.pulse_count
    }

    pub fn last_hold_ms(&self) -> u32 {
        self.last_hold_ms
    }
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}
