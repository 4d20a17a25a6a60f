//! Integration tests for the command endpoint.
//!
//! Drives the full request path — transport queue → rate limiter → auth →
//! router → app service → settings store — using the in-memory
//! `QueueTransport` and mock adapters.

use crate::mock_ports::{MemStore, MockHardware, MockNotifier, RecordingSink};

use ringring::api::auth::Credentials;
use ringring::api::engine::CommandEngine;
use ringring::api::transport::{QueueTransport, Request, Response};
use ringring::app::events::{AppEvent, OpenTrigger};
use ringring::app::service::AppService;
use ringring::config::Settings;

/// Everything one endpoint test needs, wired together.
struct Endpoint {
    engine: CommandEngine,
    transport: QueueTransport,
    app: AppService,
    store: MemStore,
    hw: MockHardware,
    notifier: MockNotifier,
    sink: RecordingSink,
}

impl Endpoint {
    fn new() -> Self {
        Self {
            engine: CommandEngine::new(),
            transport: QueueTransport::new(),
            app: AppService::new(Settings::default()),
            store: MemStore::empty(),
            hw: MockHardware::new(),
            notifier: MockNotifier::new(),
            sink: RecordingSink::new(),
        }
    }

    fn admin() -> Option<Credentials> {
        Some(Credentials::new("admin", "ringring"))
    }

    /// Push a request, run one pump, return the single response.
    fn call(&mut self, path: &str, query: &str, creds: Option<Credentials>) -> Response {
        self.transport.push_request(Request::new(path, query, creds));
        self.pump();
        let mut responses = self.transport.take_responses();
        assert_eq!(responses.len(), 1, "expected exactly one response");
        responses.remove(0)
    }

    fn pump(&mut self) {
        self.engine.pump(
            &mut self.transport,
            &mut self.app,
            &self.store,
            &mut self.hw,
            &mut self.notifier,
            &mut self.sink,
        );
    }
}

// ── Authentication ────────────────────────────────────────────

#[test]
fn request_without_credentials_is_unauthorized() {
    let mut e = Endpoint::new();
    let r = e.call("/door/open", "", None);
    assert_eq!(r.status, 401);
    assert_eq!(r.body, "Unauthorized");
    assert_eq!(e.hw.latch_opens(), 0);
}

#[test]
fn request_with_wrong_password_is_unauthorized() {
    let mut e = Endpoint::new();
    let creds = Some(Credentials::new("admin", "hunter2"));
    let r = e.call("/door/open", "", creds);
    assert_eq!(r.status, 401);
    assert_eq!(e.hw.latch_opens(), 0);
}

// ── /door/open ────────────────────────────────────────────────

#[test]
fn door_open_actuates_and_notifies() {
    let mut e = Endpoint::new();
    let r = e.call("/door/open", "", Endpoint::admin());
    assert_eq!(r.status, 200);
    assert_eq!(r.body, "Door opened");
    assert_eq!(e.hw.latch_opens(), 1);
    assert!(e
        .sink
        .events
        .contains(&AppEvent::DoorOpened {
            trigger: OpenTrigger::Command
        }));
    // notify_on_command defaults to on.
    assert_eq!(e.notifier.deliveries, vec![OpenTrigger::Command]);
}

// ── /door/key/set ─────────────────────────────────────────────

#[test]
fn key_set_replaces_secret_and_persists() {
    let mut e = Endpoint::new();
    let r = e.call("/door/key/set", "value=SLSL", Endpoint::admin());
    assert_eq!(r.status, 200);
    assert_eq!(r.body, "Code changed");
    assert_eq!(e.app.settings().secret.as_letters().as_str(), "SLSL");
    // The new secret hit the store immediately.
    assert_eq!(e.store.stored().unwrap().secret.as_letters().as_str(), "SLSL");
}

#[test]
fn key_set_accepts_lowercase() {
    let mut e = Endpoint::new();
    let r = e.call("/door/key/set", "value=sls", Endpoint::admin());
    assert_eq!(r.status, 200);
    assert_eq!(e.app.settings().secret.as_letters().as_str(), "SLS");
}

#[test]
fn key_set_rejects_invalid_char() {
    let mut e = Endpoint::new();
    let r = e.call("/door/key/set", "value=SXL", Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(r.body, "Wrong char detected");
    // Secret untouched.
    assert_eq!(e.app.settings().secret.as_letters().as_str(), "SSSSLL");
    assert!(e.store.stored().is_none());
}

#[test]
fn key_set_rejects_empty_value() {
    let mut e = Endpoint::new();
    let r = e.call("/door/key/set", "", Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(r.body, "Wrong length");
}

#[test]
fn key_set_rejects_overlong_value() {
    let mut e = Endpoint::new();
    let over = format!("value={}", "S".repeat(51));
    let r = e.call("/door/key/set", &over, Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(r.body, "Wrong length");
}

#[test]
fn key_set_reports_save_failure() {
    let mut e = Endpoint::new();
    e.store.fail_saves.set(true);
    let r = e.call("/door/key/set", "value=SL", Endpoint::admin());
    assert_eq!(r.status, 500);
    assert_eq!(r.body, "Save failed");
    // In-memory secret changed anyway; auto-save retries later.
    assert_eq!(e.app.settings().secret.as_letters().as_str(), "SL");
}

// ── /settings/set ─────────────────────────────────────────────

#[test]
fn settings_set_applies_subset_and_persists() {
    let mut e = Endpoint::new();
    let r = e.call(
        "/settings/set",
        "short=250&gap=1500&notify_sequence=1",
        Endpoint::admin(),
    );
    assert_eq!(r.status, 200);
    assert_eq!(r.body, "Settings saved");
    let s = e.app.settings();
    assert_eq!(s.timing.short_press_ceiling_ms, 250);
    assert_eq!(s.timing.inter_press_gap_ms, 1500);
    assert!(s.notify_on_sequence);
    // Unnamed parameters keep their values.
    assert_eq!(s.timing.release_timeout_ms, 800);
    assert_eq!(e.store.stored().unwrap().timing.short_press_ceiling_ms, 250);
}

#[test]
fn settings_set_rejects_unparseable_value() {
    let mut e = Endpoint::new();
    let r = e.call("/settings/set", "gap=soon", Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(r.body, "Bad value for 'gap'");
}

#[test]
fn settings_set_rejects_empty_query() {
    let mut e = Endpoint::new();
    let r = e.call("/settings/set", "", Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(r.body, "No parameters");
}

#[test]
fn settings_set_validation_failure_leaves_settings_untouched() {
    let mut e = Endpoint::new();
    // A short-press ceiling above the release timeout cannot classify
    // anything as long; validation rejects it.
    let r = e.call("/settings/set", "short=900", Endpoint::admin());
    assert_eq!(r.status, 400);
    assert_eq!(e.app.settings().timing.short_press_ceiling_ms, 300);
    assert!(e.store.stored().is_none());
}

// ── /settings read-back ───────────────────────────────────────

#[test]
fn settings_read_back_is_json_without_credentials() {
    let mut e = Endpoint::new();
    let r = e.call("/settings", "", Endpoint::admin());
    assert_eq!(r.status, 200);
    assert!(r.body.contains("\"key\":\"SSSSLL\""));
    assert!(r.body.contains("\"poll\":50"));
    assert!(r.body.contains("\"hold\":1000"));
    assert!(r.body.contains("\"notify_command\":true"));
    // No secrets besides the key itself.
    assert!(!r.body.contains("password"));
    assert!(!r.body.contains("token"));
}

// ── Unknown routes ────────────────────────────────────────────

#[test]
fn unknown_path_is_not_found() {
    let mut e = Endpoint::new();
    let r = e.call("/reboot", "", Endpoint::admin());
    assert_eq!(r.status, 404);
    assert_eq!(r.body, "Not found");
}

// ── Rate limiting ─────────────────────────────────────────────

#[test]
fn eleventh_burst_request_is_rate_limited() {
    let mut e = Endpoint::new();
    for _ in 0..11 {
        e.transport
            .push_request(Request::new("/settings", "", Endpoint::admin()));
    }
    e.pump();
    let responses = e.transport.take_responses();
    assert_eq!(responses.len(), 11);
    assert!(responses[..10].iter().all(|r| r.status == 200));
    assert_eq!(responses[10].status, 429);
    assert_eq!(responses[10].body, "Too many requests");
}
