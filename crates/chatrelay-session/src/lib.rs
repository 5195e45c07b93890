//! Session tracking for Chatrelay.
//!
//! This crate owns the answer to "who is connected, under what name":
//!
//! 1. **Session** — one live connection's mutable state (id, username,
//!    inbound framing buffer)
//! 2. **Registry** — the insertion-ordered, single-source-of-truth
//!    collection of sessions ([`SessionRegistry`])
//! 3. **Allocator** — fallback usernames for collision recovery
//!    ([`fallback_username`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Router (above)  ← mutates the registry as commands arrive
//!     ↕
//! Session layer (this crate)  ← membership, names, uniqueness checks
//!     ↕
//! Protocol / Transport (below)  ← provide LineDecoder and SessionId
//! ```

mod allocator;
mod error;
mod registry;
mod session;

pub use allocator::{FALLBACK_USERNAME_LEN, fallback_username};
pub use error::SessionError;
pub use registry::SessionRegistry;
pub use session::Session;
