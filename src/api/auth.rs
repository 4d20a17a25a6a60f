//! Endpoint authentication and rate limiting.
//!
//! Credentials travel with each request (the product bridge maps HTTP
//! basic auth onto them).  The stored password is a SHA-256 digest;
//! comparison is constant-time so response timing leaks nothing about
//! how much of the digest matched.
//!
//! Crypto is handled by the `hmac-sha256` crate — pure Rust, no_std,
//! identical on ESP-IDF and host targets.

use burster::Limiter;
use core::time::Duration;

use crate::config::Settings;

/// Per-request credentials as supplied by the transport bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: heapless::String<32>,
    pub password: heapless::String<64>,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: heapless::String::try_from(username).unwrap_or_default(),
            password: heapless::String::try_from(password).unwrap_or_default(),
        }
    }
}

/// Check request credentials against the stored account.
///
/// Both the username comparison and the digest comparison always run to
/// completion, regardless of earlier mismatches.
pub fn verify_credentials(settings: &Settings, creds: Option<&Credentials>) -> bool {
    let Some(creds) = creds else {
        return false;
    };
    let user_ok = constant_time_str_eq(creds.username.as_str(), settings.api_username.as_str());
    let digest = hmac_sha256::Hash::hash(creds.password.as_bytes());
    let pass_ok = constant_time_eq(&digest, &settings.api_password_sha256);
    user_ok & pass_ok
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn constant_time_str_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ── Rate limiting ────────────────────────────────────────────

/// Token-bucket limiter shared by all endpoint requests.
pub struct RequestLimiter {
    bucket: burster::TokenBucket<fn() -> Duration>,
}

impl RequestLimiter {
    pub fn new() -> Self {
        Self {
            bucket: burster::TokenBucket::new_with_time_provider(
                10,
                10, // 10 tokens per second, 10 burst capacity
                platform_now as fn() -> Duration,
            ),
        }
    }

    /// Consume one token; returns `false` when exhausted.
    pub fn try_acquire(&mut self) -> bool {
        self.bucket.try_consume(1).is_ok()
    }
}

impl Default for RequestLimiter {
    fn default() -> Self {
        Self::new()
    }
}

// ── Platform time for rate limiter ───────────────────────────

#[cfg(target_os = "espidf")]
fn platform_now() -> Duration {
    let us = unsafe { esp_idf_sys::esp_timer_get_time() };
    Duration::from_micros(us as u64)
}

#[cfg(not(target_os = "espidf"))]
fn platform_now() -> Duration {
    use std::time::Instant;
    static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    START.get_or_init(Instant::now).elapsed()
}

// ── Tests ────────────────────────────────────────────────────
