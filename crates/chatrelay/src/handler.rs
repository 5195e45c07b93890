//! Per-connection plumbing between the transport and the relay task.
//!
//! Each accepted connection gets two small tasks: the reader loop in
//! [`handle_connection`], which forwards raw byte chunks to the relay,
//! and a writer task that drains the session's outbound channel into
//! the socket. Neither task touches session state — that all lives
//! behind the relay handle.

use chatrelay_transport::{Connection, SessionId, TcpConnection};
use tokio::sync::mpsc;

use crate::{ChatRelayError, RelayHandle};

/// Drop guard that reports the disconnect when the handler exits.
///
/// `Drop` runs even if the reader loop errors or the task panics, so
/// the registry removal and the roster broadcast always fire exactly
/// once per connection. Since `Drop` is synchronous, the async send is
/// spawned fire-and-forget.
struct DisconnectGuard {
    id: SessionId,
    relay: RelayHandle,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let id = self.id;
        let relay = self.relay.clone();
        tokio::spawn(async move {
            let _ = relay.session_closed(id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: TcpConnection,
    relay: RelayHandle,
) -> Result<(), ChatRelayError> {
    let id = conn.id();
    tracing::debug!(%id, "handling new connection");

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    relay.session_opened(id, outbound_tx).await?;
    let _guard = DisconnectGuard {
        id,
        relay: relay.clone(),
    };

    // Writer: drain outbound wire lines into the socket. The relay
    // never waits on this — writes are fire-and-forget from its side,
    // and a write to a dead peer is simply dropped.
    let writer_conn = conn.clone();
    let writer = tokio::spawn(async move {
        while let Some(bytes) = outbound_rx.recv().await {
            if writer_conn.send(&bytes).await.is_err() {
                // Peer is gone; the reader will hit EOF and run the
                // disconnect path.
                break;
            }
        }
    });

    // Reader: forward raw chunks until EOF or error.
    let result = loop {
        match conn.recv().await {
            Ok(Some(bytes)) => {
                if relay.inbound(id, bytes).await.is_err() {
                    // Relay shut down; nothing more to route.
                    break Ok(());
                }
            }
            Ok(None) => {
                tracing::debug!(%id, "connection closed cleanly");
                break Ok(());
            }
            Err(e) => {
                tracing::debug!(%id, error = %e, "recv error");
                break Err(ChatRelayError::Transport(e));
            }
        }
    };

    writer.abort();
    // _guard drops here → the disconnect event fires.
    result
}
