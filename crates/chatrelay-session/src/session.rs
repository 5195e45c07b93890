//! The per-connection session record.

use chatrelay_protocol::LineDecoder;
use chatrelay_transport::SessionId;

/// One live client connection's server-side state.
///
/// Created when the transport reports a new connection and destroyed
/// when it reports disconnection. A session never outlives its
/// connection, and nothing in the core holds a reference to one after
/// it leaves the registry.
#[derive(Debug)]
pub struct Session {
    /// Stable handle used to address outbound writes for this session.
    pub id: SessionId,

    /// Current username. The empty string means "not yet named" — a
    /// session that was accepted but has not sent a connect command.
    /// Unnamed sessions still appear in roster broadcasts (as an empty
    /// field) and still receive traffic addressed to everyone.
    pub username: String,

    /// Inbound framing buffer, owned exclusively by this session.
    /// Dropped with the session, so a half-received line from a
    /// disconnecting client is never processed.
    pub inbound: LineDecoder,
}

impl Session {
    /// Creates a fresh, unnamed session for a newly accepted connection.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            username: String::new(),
            inbound: LineDecoder::new(),
        }
    }

    /// Returns `true` if the session has claimed a username.
    pub fn is_named(&self) -> bool {
        !self.username.is_empty()
    }
}
