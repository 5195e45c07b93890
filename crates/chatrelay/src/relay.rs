//! The relay task: single owner of all session state.
//!
//! The [`Router`] is plain synchronous code; this module gives it the
//! execution model it assumes. One tokio task owns the router and
//! drains an event channel, so every transport event — accept, inbound
//! bytes, disconnect — is serialized onto one control path. This is
//! the actor model: no shared mutable state, just message passing, and
//! mutual exclusion is structural rather than lock-based.

use chatrelay_transport::SessionId;
use tokio::sync::mpsc;

use crate::{ChatRelayError, OutboundSender, Router};

/// Event channel size for the relay task.
///
/// Bounded so a flood of inbound traffic exerts backpressure on the
/// connection reader tasks instead of growing memory without limit.
const DEFAULT_CHANNEL_SIZE: usize = 256;

/// A transport-reported event, tagged with the originating session id.
#[derive(Debug)]
pub enum RelayEvent {
    /// A new connection was accepted; `outbound` delivers wire bytes
    /// to its writer task.
    SessionOpened {
        /// Id of the new session.
        id: SessionId,
        /// Sink for outbound wire lines addressed to this session.
        outbound: OutboundSender,
    },

    /// Raw inbound bytes from a connection, in arrival order.
    Inbound {
        /// Originating session.
        id: SessionId,
        /// One transport delivery, possibly a partial line.
        bytes: Vec<u8>,
    },

    /// The connection is gone.
    SessionClosed {
        /// Id of the departed session.
        id: SessionId,
    },
}

/// Handle to the running relay task.
///
/// Cheap to clone — every connection handler holds one. All methods
/// are fire-and-forget from the caller's perspective: they only fail
/// if the relay task itself has stopped.
#[derive(Clone)]
pub struct RelayHandle {
    sender: mpsc::Sender<RelayEvent>,
}

impl RelayHandle {
    /// Reports a newly accepted connection.
    pub async fn session_opened(
        &self,
        id: SessionId,
        outbound: OutboundSender,
    ) -> Result<(), ChatRelayError> {
        self.sender
            .send(RelayEvent::SessionOpened { id, outbound })
            .await
            .map_err(|_| ChatRelayError::RelayClosed)
    }

    /// Forwards one delivery of raw inbound bytes.
    pub async fn inbound(
        &self,
        id: SessionId,
        bytes: Vec<u8>,
    ) -> Result<(), ChatRelayError> {
        self.sender
            .send(RelayEvent::Inbound { id, bytes })
            .await
            .map_err(|_| ChatRelayError::RelayClosed)
    }

    /// Reports that a connection is gone.
    pub async fn session_closed(
        &self,
        id: SessionId,
    ) -> Result<(), ChatRelayError> {
        self.sender
            .send(RelayEvent::SessionClosed { id })
            .await
            .map_err(|_| ChatRelayError::RelayClosed)
    }
}

/// Spawns the relay task and returns a handle for feeding it events.
///
/// The task runs until every handle is dropped, then stops; the router
/// and all session state drop with it.
pub fn spawn_relay() -> RelayHandle {
    let (tx, mut rx) = mpsc::channel(DEFAULT_CHANNEL_SIZE);

    tokio::spawn(async move {
        let mut router = Router::new();
        tracing::debug!("relay task started");

        while let Some(event) = rx.recv().await {
            match event {
                RelayEvent::SessionOpened { id, outbound } => {
                    router.handle_accept(id, outbound);
                }
                RelayEvent::Inbound { id, bytes } => {
                    router.handle_bytes(id, &bytes);
                }
                RelayEvent::SessionClosed { id } => {
                    router.handle_disconnect(id);
                }
            }
        }

        tracing::debug!("relay task stopped");
    });

    RelayHandle { sender: tx }
}
