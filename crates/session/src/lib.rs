//! Session protocol engine of the proverd proof-computation worker.
//!
//! This crate owns the orchestrator-facing side of the worker: a long-lived,
//! bidirectional, message-oriented connection over which typed commands
//! arrive, are validated and translated into job descriptors, handed to the
//! shared [`JobRegistry`](proverd_registry::JobRegistry), and answered with
//! correlated responses.
//!
//! The pieces, leaf first:
//!
//! - [`translate`] turns an untrusted command payload into a validated
//!   job input, or rejects it;
//! - [`assemble`] builds the kind-specific outbound payloads;
//! - [`Dispatcher`] maps each inbound command to its handler, producing
//!   exactly one response per request;
//! - [`StreamSession`] keeps the connection alive: read, dispatch, write,
//!   and reconnect forever on transport failure.

use thiserror::Error;

pub mod assemble;
pub mod dispatch;
pub mod host;
pub mod stream;
pub mod translate;

pub use dispatch::Dispatcher;
pub use host::{HostFacts, MemoryInfo, StaticFacts, SystemFacts};
pub use stream::{read_frame, write_frame, RetryPolicy, StreamSession};
pub use translate::TranslateError;

use proverd_registry::SubmitError;

/// Errors surfaced by the session layer.
///
/// Transport and decoding failures are handled inside the reconnect loop;
/// only a registry submission failure is allowed to escape [`StreamSession::run`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode inbound frame: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("job registry error: {0}")]
    Registry(#[from] SubmitError),
}
