//! Wire protocol for Chatrelay.
//!
//! This crate defines the "language" that clients and the relay speak:
//! a line-oriented, UTF-8, `\n`-terminated text protocol.
//!
//! - **Types** ([`Command`], [`ServerEvent`]) — the messages that
//!   travel on the wire, inbound and outbound.
//! - **Codec** ([`LineDecoder`], [`parse_command`], [`encode_event`]) —
//!   how byte chunks become complete lines, lines become commands, and
//!   events become wire bytes.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the
//! router (session state). It knows nothing about connections or who
//! is online — it only frames, parses, and renders.
//!
//! ```text
//! Transport (bytes) → Protocol (Command) → Router (session state)
//! ```

mod codec;
mod types;

pub use codec::{LineDecoder, encode_event, parse_command};
pub use types::{Command, ServerEvent};
