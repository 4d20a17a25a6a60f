//! GPIO / peripheral pin assignments for the RingRing door board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Door button (active-low with external pull-up)
// ---------------------------------------------------------------------------

/// Momentary doorbell push-button.  LOW = pressed.
pub const DOOR_BUTTON_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Door latch relay
// ---------------------------------------------------------------------------

/// Relay driving the electric strike.  Inverse logic: LOW = energised
/// (strike released), HIGH = resting.
pub const DOOR_RELAY_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// On-board status LED, active-low, PWM-dimmed via LEDC.
pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC frequency for the status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;
