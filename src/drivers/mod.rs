//! Peripheral drivers and hardware initialisation.

pub mod button;
pub mod hw_init;
pub mod indicator;
pub mod relay;
pub mod status_led;
