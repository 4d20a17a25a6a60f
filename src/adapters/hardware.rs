//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the relay and status-LED drivers and reads the door button,
//! exposing them through [`InputPort`] and [`ActuatorPort`].  This is the
//! only module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs and the
//! button level is settable for tests.

use crate::app::ports::{ActuatorPort, InputPort};
use crate::drivers::relay::RelayDriver;
use crate::drivers::status_led::StatusLed;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
#[cfg(target_os = "espidf")]
use crate::pins;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    relay: RelayDriver,
    led: StatusLed,
    #[cfg(not(target_os = "espidf"))]
    sim_pressed: bool,
}

impl HardwareAdapter {
    pub fn new(relay: RelayDriver, led: StatusLed) -> Self {
        Self {
            relay,
            led,
            #[cfg(not(target_os = "espidf"))]
            sim_pressed: false,
        }
    }

    /// Drive the simulated button level (host/test only).
    #[cfg(not(target_os = "espidf"))]
    pub fn set_sim_pressed(&mut self, pressed: bool) {
        self.sim_pressed = pressed;
    }
}

// ── InputPort implementation ──────────────────────────────────

impl InputPort for HardwareAdapter {
    #[cfg(target_os = "espidf")]
    fn button_pressed(&mut self) -> bool {
        // Active-low with pull-up: LOW means the button is held.
        !hw_init::gpio_read(pins::DOOR_BUTTON_GPIO)
    }

    #[cfg(not(target_os = "espidf"))]
    fn button_pressed(&mut self) -> bool {
        self.sim_pressed
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn open_latch(&mut self, hold_ms: u32) {
        self.relay.pulse(hold_ms);
    }

    fn set_indicator(&mut self, duty: u8) {
        self.led.set_brightness(duty);
    }
}
