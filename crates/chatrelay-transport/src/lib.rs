//! Transport abstraction layer for Chatrelay.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the byte-stream provider the relay core runs atop, plus the default
//! TCP implementation ([`TcpTransport`]).
//!
//! The relay core never touches sockets directly. It consumes three
//! kinds of events — accept, inbound bytes, disconnect — each tagged
//! with the [`SessionId`] of the originating connection, and issues
//! fire-and-forget writes addressed by the same id.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{TcpConnection, TcpTransport};

use std::fmt;

/// Opaque identifier for one live connection, and therefore one session.
///
/// Stable for the connection's lifetime and never reused while the
/// session is registered — ids come from a process-wide monotonic
/// counter, so a client that reconnects always gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Creates a new `SessionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sess-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Gracefully shuts down the transport, stopping new connections.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// A single connection that can send and receive raw bytes.
///
/// Deliveries are arbitrary chunks — one chunk may carry half a command
/// line or several complete lines. Framing is the protocol layer's job,
/// not the transport's.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends bytes to the remote peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next chunk of bytes from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> SessionId;
}
