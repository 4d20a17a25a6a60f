//! RingRing Firmware — Main Entry Point
//!
//! Hexagonal architecture around a polled button-sequence FSM.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter    LogEventSink    SettingsStore            │
//! │  (Input+Actuator)   (EventSink)     (SettingsPort)           │
//! │  TelegramNotifier   UptimeClock     CommandEngine            │
//! │  (NotifyPort)       (monotonic ms)  (endpoint routing)       │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ──────────────────      │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │            AppService (pure logic)                   │    │
//! │  │  button sampler · attempt FSM · settings lifecycle   │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod error;
mod pins;

pub mod api;
pub mod app;
pub mod fsm;
pub mod sequence;

mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

use adapters::hardware::HardwareAdapter;
use adapters::log_sink::LogEventSink;
use adapters::notify::TelegramNotifier;
use adapters::storage::SettingsStore;
use adapters::time::UptimeClock;
use api::engine::CommandEngine;
use api::transport::NullTransport;
use app::ports::{ActuatorPort, SettingsPort};
use app::service::AppService;
use config::Settings;
use drivers::indicator::{IndicatorEngine, PATTERN_ATTEMPT, PATTERN_IDLE};
use drivers::relay::RelayDriver;
use drivers::status_led::StatusLed;
use error::Error;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  RingRing v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    // Failure here is critical: abort and let the supervisor reset us.
    // The relay is parked de-energised as the very first output write.
    drivers::hw_init::init_peripherals().map_err(Error::from)?;

    // ── 3. Load settings from NVS (or defaults) ───────────────
    let store = match SettingsStore::new() {
        Ok(s) => s,
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            // Continue without NVS — settings will not be persisted this
            // session. On next reboot, NVS should self-heal.
            SettingsStore::default()
        }
    };
    let settings = match store.load() {
        Ok(s) => {
            info!("Settings loaded from NVS");
            s
        }
        Err(app::ports::SettingsError::NotFound) => {
            info!("First run detected, persisting factory settings");
            let defaults = Settings::default();
            if let Err(e) = store.save(&defaults) {
                warn!("Could not persist factory settings: {}", e);
            }
            defaults
        }
        Err(e) => {
            warn!("Settings load failed ({}), using defaults", e);
            Settings::default()
        }
    };

    info!("Secret sequence: {} ({} presses)", settings.secret, settings.secret.len());
    info!(
        "Timing: poll={}ms short<{}ms release<={}ms wait<={}ms gap={}ms hold={}ms",
        settings.timing.polling_interval_ms,
        settings.timing.short_press_ceiling_ms,
        settings.timing.release_timeout_ms,
        settings.timing.inter_press_timeout_ms,
        settings.timing.inter_press_gap_ms,
        settings.timing.actuation_hold_ms,
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let clock = UptimeClock::new();
    let mut hw = HardwareAdapter::new(RelayDriver::new(), StatusLed::new());
    let mut log_sink = LogEventSink::new();
    let mut notifier =
        TelegramNotifier::new(settings.telegram_token.as_str(), settings.telegram_chat_id.as_str());
    if !notifier.is_configured() {
        info!("Telegram notifier not configured; openings are logged only");
    }

    // ── 5. Construct app service ──────────────────────────────
    let mut app = AppService::new(settings);
    app.start(&mut log_sink);

    // ── 6. Command endpoint ───────────────────────────────────
    // The endpoint engine runs against a NullTransport until the product
    // integration supplies an HTTP bridge implementing CommandTransport.
    let mut transport = NullTransport;
    let mut engine = CommandEngine::new();

    // ── 7. Status indicator ───────────────────────────────────
    let mut indicator = IndicatorEngine::new();
    indicator.set_pattern(PATTERN_IDLE);

    info!("System ready. Entering poll loop.");

    // ── 8. Poll loop ──────────────────────────────────────────
    let mut last_poll_ms = 0u64;
    let mut last_loop_ms = clock.uptime_ms();

    loop {
        // Pace the loop. On ESP-IDF this maps onto vTaskDelay, yielding
        // to the idle task; on the host it avoids a busy spin.
        std::thread::sleep(Duration::from_millis(5));

        // Endpoint requests are answered every iteration, independent of
        // the button sampling cadence.
        engine.pump(&mut transport, &mut app, &store, &mut hw, &mut notifier, &mut log_sink);

        let now_ms = clock.uptime_ms();

        // Button sampling + FSM advance at the configured cadence.
        if now_ms.saturating_sub(last_poll_ms) >= u64::from(app.settings().timing.polling_interval_ms) {
            app.poll(now_ms, &mut hw, &mut notifier, &mut log_sink);
            last_poll_ms = now_ms;
        }

        // Indicator follows the attempt: breathe while idle, blink while
        // a sequence is being entered.
        let pattern = if app.attempt_live() { PATTERN_ATTEMPT } else { PATTERN_IDLE };
        indicator.set_pattern(pattern);
        let delta_ms = now_ms.saturating_sub(last_loop_ms) as u32;
        last_loop_ms = now_ms;
        hw.set_indicator(indicator.tick(delta_ms));

        // Settings auto-save (5s debounce after last change).
        app.auto_save_if_needed(&store);
    }
}
