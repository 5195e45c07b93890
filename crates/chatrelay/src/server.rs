//! `ChatServer` builder and accept loop.
//!
//! This is the entry point for running a relay. It ties the layers
//! together: transport → protocol → session, with the relay task in
//! the middle owning all state.

use chatrelay_transport::{TcpTransport, Transport};

use crate::handler::handle_connection;
use crate::relay::spawn_relay;
use crate::{ChatRelayError, RelayHandle};

/// Builder for configuring and starting a chat relay server.
///
/// # Example
///
/// ```rust,no_run
/// use chatrelay::ChatServerBuilder;
///
/// # async fn run() -> Result<(), chatrelay::ChatRelayError> {
/// let server = ChatServerBuilder::new()
///     .bind("0.0.0.0:4000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ChatServerBuilder {
    bind_addr: String,
}

impl ChatServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".to_string(),
        }
    }

    /// Sets the address to bind the listener to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and spawns the relay task.
    ///
    /// Bind failure is reported here, once; there is no retry.
    pub async fn build(self) -> Result<ChatServer, ChatRelayError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;
        let relay = spawn_relay();
        Ok(ChatServer { transport, relay })
    }
}

impl Default for ChatServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running chat relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ChatServer {
    transport: TcpTransport,
    relay: RelayHandle,
}

impl ChatServer {
    /// Creates a new builder.
    pub fn builder() -> ChatServerBuilder {
        ChatServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler for each.
    /// Runs until the process is terminated; a failed accept is logged
    /// and the loop continues.
    pub async fn run(mut self) -> Result<(), ChatRelayError> {
        tracing::info!("chat relay running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let relay = self.relay.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, relay).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
