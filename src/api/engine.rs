//! Request routing for the command endpoint.
//!
//! Every request passes the rate limiter, then authentication, then the
//! route table.  Replies are short text bodies except `/settings`, which
//! returns a JSON read-back of the live configuration.
//!
//! | Route            | Action                                   | Reply            |
//! |------------------|------------------------------------------|------------------|
//! | `/door/open`     | open the latch now                       | `Door opened`    |
//! | `/door/key/set`  | replace the secret (`?value=SSL...`)     | `Code changed`   |
//! | `/settings/set`  | sparse timing / flag update              | `Settings saved` |
//! | `/settings`      | JSON read-back                           | `{...}`          |

use serde::Serialize;

use crate::app::commands::{AppCommand, SettingsUpdate};
use crate::app::ports::{ActuatorPort, EventSink, NotifyPort, SettingsPort};
use crate::app::service::AppService;
use crate::sequence::{SecretSequence, SequenceParseError};

use super::auth::{verify_credentials, RequestLimiter};
use super::transport::{CommandTransport, Request, Response};

/// Endpoint engine: rate limiter + router.  One instance per device.
pub struct CommandEngine {
    limiter: RequestLimiter,
}

impl CommandEngine {
    pub fn new() -> Self {
        Self {
            limiter: RequestLimiter::new(),
        }
    }

    /// Drain the transport, answering every pending request.
    /// Called once per main-loop iteration.
    pub fn pump<T: CommandTransport>(
        &mut self,
        transport: &mut T,
        app: &mut AppService,
        store: &impl SettingsPort,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) {
        while let Some(request) = transport.poll_request() {
            let response = self.dispatch(&request, app, store, hw, notifier, sink);
            transport.send_response(response);
        }
    }

    fn dispatch(
        &mut self,
        request: &Request,
        app: &mut AppService,
        store: &impl SettingsPort,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> Response {
        if !self.limiter.try_acquire() {
            return Response::new(429, "Too many requests");
        }
        if !verify_credentials(app.settings(), request.credentials.as_ref()) {
            return Response::new(401, "Unauthorized");
        }

        match request.path.as_str() {
            "/door/open" => {
                app.force_open(hw, notifier, sink);
                Response::new(200, "Door opened")
            }
            "/door/key/set" => Self::handle_key_set(request, app, store, hw, notifier, sink),
            "/settings/set" => Self::handle_settings_set(request, app, store, hw, notifier, sink),
            "/settings" => Self::handle_settings_read(app),
            _ => Response::new(404, "Not found"),
        }
    }

    // ── /door/key/set ─────────────────────────────────────────

    fn handle_key_set(
        request: &Request,
        app: &mut AppService,
        store: &impl SettingsPort,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> Response {
        let value = query_param(&request.query, "value").unwrap_or("");
        match SecretSequence::parse(value) {
            Ok(secret) => {
                app.handle_command(AppCommand::SetSecret(secret), hw, notifier, sink);
                if app.force_save_if_dirty(store) {
                    Response::new(200, "Code changed")
                } else {
                    Response::new(500, "Save failed")
                }
            }
            Err(SequenceParseError::Empty | SequenceParseError::TooLong) => {
                Response::new(400, "Wrong length")
            }
            Err(SequenceParseError::InvalidChar(_)) => Response::new(400, "Wrong char detected"),
        }
    }

    // ── /settings/set ─────────────────────────────────────────

    fn handle_settings_set(
        request: &Request,
        app: &mut AppService,
        store: &impl SettingsPort,
        hw: &mut impl ActuatorPort,
        notifier: &mut impl NotifyPort,
        sink: &mut impl EventSink,
    ) -> Response {
        let update = match parse_settings_query(&request.query) {
            Ok(update) => update,
            Err(param) => return Response::new(400, format!("Bad value for '{}'", param)),
        };
        if update.is_empty() {
            return Response::new(400, "No parameters");
        }

        // Dry-run against a copy so a rejected update leaves nothing behind.
        let mut candidate = app.settings().clone();
        update.apply_to(&mut candidate);
        if let Err(msg) = candidate.validate() {
            return Response::new(400, msg);
        }

        app.handle_command(AppCommand::UpdateSettings(update), hw, notifier, sink);
        if app.force_save_if_dirty(store) {
            Response::new(200, "Settings saved")
        } else {
            Response::new(500, "Save failed")
        }
    }

    // ── /settings ─────────────────────────────────────────────

    fn handle_settings_read(app: &AppService) -> Response {
        let s = app.settings();
        let letters = s.secret.as_letters();
        let view = SettingsView {
            key: letters.as_str(),
            poll: s.timing.polling_interval_ms,
            short: s.timing.short_press_ceiling_ms,
            release: s.timing.release_timeout_ms,
            wait: s.timing.inter_press_timeout_ms,
            gap: s.timing.inter_press_gap_ms,
            hold: s.timing.actuation_hold_ms,
            notify_sequence: s.notify_on_sequence,
            notify_command: s.notify_on_command,
        };
        match serde_json::to_string(&view) {
            Ok(body) => Response::new(200, body),
            Err(_) => Response::new(500, "Serialization failed"),
        }
    }
}

impl Default for CommandEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-back shape for `/settings`.  Credentials and the notification
/// token are deliberately absent.
#[derive(Serialize)]
struct SettingsView<'a> {
    key: &'a str,
    poll: u32,
    short: u32,
    release: u32,
    wait: u32,
    gap: u32,
    hold: u32,
    notify_sequence: bool,
    notify_command: bool,
}

// ── Query-string helpers ─────────────────────────────────────

/// Find `key` in a `a=1&b=2` style query string.
fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Build a [`SettingsUpdate`] from the `/settings/set` query parameters.
/// Returns the offending parameter name on a parse failure.
fn parse_settings_query(query: &str) -> Result<SettingsUpdate, &'static str> {
    let mut update = SettingsUpdate::default();
    update.polling_interval_ms = parse_u32_param(query, "poll")?;
    update.short_press_ceiling_ms = parse_u32_param(query, "short")?;
    update.release_timeout_ms = parse_u32_param(query, "release")?;
    update.inter_press_timeout_ms = parse_u32_param(query, "wait")?;
    update.inter_press_gap_ms = parse_u32_param(query, "gap")?;
    update.actuation_hold_ms = parse_u32_param(query, "hold")?;
    update.notify_on_sequence = parse_bool_param(query, "notify_sequence")?;
    update.notify_on_command = parse_bool_param(query, "notify_command")?;
    Ok(update)
}

fn parse_u32_param(query: &str, key: &'static str) -> Result<Option<u32>, &'static str> {
    match query_param(query, key) {
        None => Ok(None),
        Some(raw) => raw.parse::<u32>().map(Some).map_err(|_| key),
    }
}

fn parse_bool_param(query: &str, key: &'static str) -> Result<Option<bool>, &'static str> {
    match query_param(query, key) {
        None => Ok(None),
        Some("1") | Some("true") => Ok(Some(true)),
        Some("0") | Some("false") => Ok(Some(false)),
        Some(_) => Err(key),
    }
}
