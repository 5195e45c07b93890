//! Error types for the session layer.

use chatrelay_transport::SessionId;

/// Errors that can occur in the session registry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The id is already registered. Ids come from a monotonic
    /// counter, so this indicates a wiring bug, not a runtime race.
    #[error("session {0} already registered")]
    DuplicateSession(SessionId),

    /// No session with this id. Expected during disconnect races
    /// (e.g. a write raced a removal) and handled by ignoring.
    #[error("session {0} not found")]
    NotFound(SessionId),
}
