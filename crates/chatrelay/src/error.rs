//! Unified error type for the chatrelay meta crate.

use chatrelay_transport::TransportError;

/// Top-level error wrapping the layer-specific errors.
///
/// The `#[from]` attribute auto-generates the `From` impl, so the `?`
/// operator converts transport errors automatically. Note what is NOT
/// here: protocol problems. Malformed input is silently ignored by
/// design, so it never surfaces as an error at all.
#[derive(Debug, thiserror::Error)]
pub enum ChatRelayError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The relay task's event channel is closed — the server is
    /// shutting down and no more events can be routed.
    #[error("relay task is unavailable")]
    RelayClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let relay_err: ChatRelayError = err.into();
        assert!(matches!(relay_err, ChatRelayError::Transport(_)));
        assert!(relay_err.to_string().contains("gone"));
    }

    #[test]
    fn test_relay_closed_display() {
        let err = ChatRelayError::RelayClosed;
        assert_eq!(err.to_string(), "relay task is unavailable");
    }
}
