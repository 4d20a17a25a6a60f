//! Integration tests for the settings persistence lifecycle.
//!
//! Exercises the real `SettingsStore` (simulation backend on the host)
//! through the same first-boot / runtime-change / reload flows that the
//! firmware entry point runs.

use crate::mock_ports::{MockHardware, MockNotifier, RecordingSink};

use ringring::adapters::storage::SettingsStore;
use ringring::app::commands::{AppCommand, SettingsUpdate};
use ringring::app::ports::{SettingsError, SettingsPort};
use ringring::app::service::AppService;
use ringring::config::Settings;
use ringring::sequence::SecretSequence;

/// The boot-time settings resolution, as the entry point performs it.
fn boot_settings(store: &SettingsStore) -> Settings {
    match store.load() {
        Ok(s) => s,
        Err(SettingsError::NotFound) => {
            let defaults = Settings::default();
            store.save(&defaults).expect("factory settings must persist");
            defaults
        }
        Err(_) => Settings::default(),
    }
}

// ── First boot ────────────────────────────────────────────────

#[test]
fn first_boot_persists_factory_settings() {
    let store = SettingsStore::new().unwrap();
    assert!(matches!(store.load(), Err(SettingsError::NotFound)));

    let settings = boot_settings(&store);
    assert_eq!(settings, Settings::default());

    // The blob is now on "flash": a second boot reads it back.
    assert_eq!(store.load().unwrap(), Settings::default());
}

// ── Runtime change survives a reboot ──────────────────────────

#[test]
fn runtime_change_survives_reboot() {
    let store = SettingsStore::new().unwrap();
    let mut app = AppService::new(boot_settings(&store));
    let mut hw = MockHardware::new();
    let mut notifier = MockNotifier::new();
    let mut sink = RecordingSink::new();

    app.handle_command(
        AppCommand::SetSecret(SecretSequence::parse("LLSS").unwrap()),
        &mut hw,
        &mut notifier,
        &mut sink,
    );
    app.handle_command(
        AppCommand::UpdateSettings(SettingsUpdate {
            actuation_hold_ms: Some(2000),
            ..Default::default()
        }),
        &mut hw,
        &mut notifier,
        &mut sink,
    );
    assert!(app.force_save_if_dirty(&store));

    // "Reboot": a fresh service built from a fresh load.
    let reloaded = boot_settings(&store);
    assert_eq!(reloaded.secret.as_letters().as_str(), "LLSS");
    assert_eq!(reloaded.timing.actuation_hold_ms, 2000);
    let app2 = AppService::new(reloaded);
    assert_eq!(app2.settings().secret.as_letters().as_str(), "LLSS");
}

// ── Corruption falls back to defaults ─────────────────────────

#[test]
fn corrupted_blob_boots_with_defaults() {
    let store = SettingsStore::new().unwrap();
    store.inject_raw(&[0xDE, 0xAD, 0xBE, 0xEF]);
    assert!(matches!(store.load(), Err(SettingsError::Corrupted)));

    // The boot path treats corruption as "use defaults, do not overwrite".
    let settings = boot_settings(&store);
    assert_eq!(settings, Settings::default());
}

// ── Validation guards the flash path end to end ───────────────

#[test]
fn endpoint_style_invalid_update_never_reaches_flash() {
    let store = SettingsStore::new().unwrap();
    store.save(&Settings::default()).unwrap();

    let mut bad = Settings::default();
    bad.timing.polling_interval_ms = 0;
    assert!(matches!(
        store.save(&bad),
        Err(SettingsError::ValidationFailed(_))
    ));
    assert_eq!(store.load().unwrap(), Settings::default());
}
