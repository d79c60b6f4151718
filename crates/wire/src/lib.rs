//! One-shot result delivery between the split worker and its caller.
//!
//! A worker process produces exactly one result payload per invocation
//! and must not exit before the caller has seen it. This crate provides
//! the request/acknowledge channel for that handshake:
//!
//! - [`Message`] — JSON envelope with topic, payload and correlation id
//! - [`Transport`] — IPC or TCP endpoint addressing
//! - [`ResultClient`] / [`ResultServer`] — REQ/REP pair; the client
//!   sends one message and waits for the ack, the server receives one
//!   message and acknowledges it

pub mod error;
pub mod message;
pub mod reqrep;
pub mod transport;

pub use error::WireError;
pub use message::Message;
pub use reqrep::{ResultClient, ResultServer};
pub use transport::Transport;

/// Topic for the single result message a split worker emits.
pub const SPLIT_RESULT: &str = "split.result";

/// Topic for the acknowledge reply.
pub const SPLIT_ACK: &str = "split.ack";
