//! # Chatrelay
//!
//! Server core for a line-oriented chat relay: accepts many concurrent
//! text connections, tracks a registry of named sessions, parses a
//! small command protocol, and routes messages — broadcast or targeted
//! — between sessions, keeping every session's view of who is online
//! consistent.
//!
//! All session state lives on one owning task (the relay task), so
//! commands are processed strictly one at a time and the registry
//! needs no locking.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chatrelay::ChatServerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chatrelay::ChatRelayError> {
//!     let server = ChatServerBuilder::new()
//!         .bind("0.0.0.0:4000")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod relay;
mod router;
mod server;

pub use error::ChatRelayError;
pub use relay::{RelayEvent, RelayHandle, spawn_relay};
pub use router::{OutboundSender, Router};
pub use server::{ChatServer, ChatServerBuilder};

/// Convenience re-exports for building on the relay core.
pub mod prelude {
    pub use chatrelay_protocol::{
        Command, LineDecoder, ServerEvent, encode_event, parse_command,
    };
    pub use chatrelay_session::{
        Session, SessionRegistry, fallback_username,
    };
    pub use chatrelay_transport::{
        Connection, SessionId, TcpTransport, Transport, TransportError,
    };

    pub use crate::{
        ChatRelayError, ChatServer, ChatServerBuilder, OutboundSender,
        RelayEvent, RelayHandle, Router, spawn_relay,
    };
}
