//! Command transport abstraction.
//!
//! Concrete implementations:
//! - HTTP server bridge (product integration, outside this crate)
//! - In-memory queue (tests, host demo)
//!
//! The command engine is generic over `CommandTransport`, so adding a
//! new transport requires zero changes to the routing logic.

use super::auth::Credentials;

/// One inbound endpoint request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Target path, e.g. `/door/open`.
    pub path: heapless::String<64>,
    /// Raw query string without the leading `?`, e.g. `value=SSL`.
    pub query: heapless::String<192>,
    /// Credentials, if the bridge extracted any.
    pub credentials: Option<Credentials>,
}

impl Request {
    pub fn new(path: &str, query: &str, credentials: Option<Credentials>) -> Self {
        Self {
            path: heapless::String::try_from(path).unwrap_or_default(),
            query: heapless::String::try_from(query).unwrap_or_default(),
            credentials,
        }
    }
}

/// The engine's answer: an HTTP-ish status code and a small text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Request/response channel between a server bridge and the engine.
pub trait CommandTransport {
    /// Take the next pending request, if any (non-blocking).
    fn poll_request(&mut self) -> Option<Request>;

    /// Deliver the response for the most recently polled request.
    fn send_response(&mut self, response: Response);
}

/// A transport with no peer: never produces requests, drops responses.
/// Useful as a default when no server bridge is connected.
pub struct NullTransport;

impl CommandTransport for NullTransport {
    fn poll_request(&mut self) -> Option<Request> {
        None
    }

    fn send_response(&mut self, _response: Response) {}
}

/// In-memory loopback transport for tests and the host demo.
#[derive(Default)]
pub struct QueueTransport {
    inbox: std::collections::VecDeque<Request>,
    outbox: Vec<Response>,
}

impl QueueTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request for the engine to pick up.
    pub fn push_request(&mut self, request: Request) {
        self.inbox.push_back(request);
    }

    /// Drain all responses produced so far.
    pub fn take_responses(&mut self) -> Vec<Response> {
        core::mem::take(&mut self.outbox)
    }
}

impl CommandTransport for QueueTransport {
    fn poll_request(&mut self) -> Option<Request> {
        self.inbox.pop_front()
    }

    fn send_response(&mut self, response: Response) {
        self.outbox.push(response);
    }
}
