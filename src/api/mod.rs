//! Remote command endpoint — transport-independent request engine.
//!
//! The actual network server (HTTP over Wi-Fi in the product) lives
//! outside this crate; it feeds requests through the
//! [`CommandTransport`](transport::CommandTransport) trait and ships the
//! responses back.  Everything on this side is plain Rust that runs
//! identically on device and host:
//!
//! ```text
//!   server bridge ──▶ CommandTransport ──▶ CommandEngine ──▶ AppService
//!                                            │  auth + rate limit
//!                                            └─▶ SettingsPort (persist)
//! ```

pub mod auth;
pub mod engine;
pub mod transport;
