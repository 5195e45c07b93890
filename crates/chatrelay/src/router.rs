//! The message router: the per-session protocol state machine.
//!
//! This is the heart of the relay. It interprets decoded command lines
//! against the session registry, mutates it as needed, and produces
//! outbound wire lines addressed to one session or to everyone.
//!
//! The router is plain synchronous code with no locking: it is owned
//! by the single relay task (see [`spawn_relay`](crate::spawn_relay)),
//! so no two commands are ever processed concurrently. Within one
//! delivery, each line is fully routed — all its outbound effects
//! issued — before the next line is even parsed, which is what keeps a
//! half-processed rename from ever being observable.

use std::collections::HashMap;

use chatrelay_protocol::{Command, ServerEvent, encode_event, parse_command};
use chatrelay_session::{SessionRegistry, fallback_username};
use chatrelay_transport::SessionId;
use tokio::sync::mpsc;

/// Channel sender that delivers wire bytes to one session's writer task.
///
/// Unbounded on purpose: the router issues writes without waiting for
/// completion, and never retries. Backpressure, if any, is the
/// transport's concern.
pub type OutboundSender = mpsc::UnboundedSender<Vec<u8>>;

/// Routes commands between sessions and keeps the roster consistent.
pub struct Router {
    registry: SessionRegistry,
    /// Per-session outbound channels, kept in lockstep with the registry.
    outbound: HashMap<SessionId, OutboundSender>,
}

impl Router {
    /// Creates a router with an empty registry.
    pub fn new() -> Self {
        Self {
            registry: SessionRegistry::new(),
            outbound: HashMap::new(),
        }
    }

    /// Read-only view of the registry.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Handles a newly accepted connection: registers an unnamed
    /// session and broadcasts the updated roster.
    pub fn handle_accept(&mut self, id: SessionId, outbound: OutboundSender) {
        if let Err(e) = self.registry.insert(id) {
            tracing::warn!(%id, error = %e, "accept for a registered session, ignoring");
            return;
        }
        self.outbound.insert(id, outbound);
        tracing::info!(%id, online = self.registry.len(), "session accepted");
        self.broadcast_roster();
    }

    /// Feeds one transport delivery into the session's framing buffer
    /// and routes every complete line it yields, in arrival order.
    pub fn handle_bytes(&mut self, id: SessionId, bytes: &[u8]) {
        match self.registry.get_mut(id) {
            Some(session) => session.inbound.push(bytes),
            None => {
                tracing::debug!(%id, "bytes for unregistered session, dropping");
                return;
            }
        }

        // Pop one line at a time: routing a line mutates the registry,
        // so the borrow on the session's buffer cannot be held across
        // the call.
        loop {
            let line = match self.registry.get_mut(id) {
                Some(session) => session.inbound.next_line(),
                None => break,
            };
            match line {
                Some(line) => self.route_line(id, &line),
                None => break,
            }
        }
    }

    /// Handles a disconnect: removes the session (discarding any
    /// buffered partial input with it) and broadcasts the roster to
    /// everyone remaining.
    ///
    /// This runs as one uninterrupted step on the relay task — no
    /// command from another session can interleave inside it.
    pub fn handle_disconnect(&mut self, id: SessionId) {
        self.outbound.remove(&id);
        match self.registry.remove(id) {
            Ok(session) => {
                tracing::info!(
                    %id,
                    username = %session.username,
                    online = self.registry.len(),
                    "session disconnected"
                );
                self.broadcast_roster();
            }
            Err(_) => {
                tracing::debug!(%id, "disconnect for unknown session");
            }
        }
    }

    // -- Command dispatch -------------------------------------------------

    fn route_line(&mut self, id: SessionId, line: &str) {
        let Some(command) = parse_command(line) else {
            // Unrecognized prefixes get no response and no registry
            // change; silence here is part of the wire contract.
            tracing::trace!(%id, line, "ignoring unrecognized input");
            return;
        };

        match command {
            Command::Connect { username } => self.handle_connect(id, username),
            Command::ChangeName { username } => {
                self.handle_change_name(id, username);
            }
            Command::Broadcast { text } => self.handle_broadcast(id, &text),
            Command::Private { recipient, text } => {
                self.handle_private(id, &recipient, &text);
            }
        }
    }

    /// `CONNECT:<name>` — assign the requested name, or a random
    /// fallback if another session already holds it. Either way the
    /// full roster goes out afterwards.
    ///
    /// Note the asymmetry with rename: a connect collision recovers
    /// automatically, a rename collision is rejected. Both behaviors
    /// are part of the protocol as clients know it.
    fn handle_connect(&mut self, id: SessionId, requested: String) {
        let assigned = if self.registry.username_taken_by_other(&requested, id)
        {
            let replacement = fallback_username();
            self.send_to_one(
                id,
                &ServerEvent::Notice(format!(
                    "Username taken. New username: {replacement}"
                )),
            );
            tracing::info!(
                %id,
                requested = %requested,
                assigned = %replacement,
                "username collision, fallback assigned"
            );
            replacement
        } else {
            tracing::info!(%id, username = %requested, "user connected");
            requested
        };

        if let Some(session) = self.registry.get_mut(id) {
            session.username = assigned;
        }
        self.broadcast_roster();
    }

    /// `CHANGE_NAME:<name>` — rename if the name is free, otherwise
    /// reject with a notice and leave everything untouched.
    fn handle_change_name(&mut self, id: SessionId, requested: String) {
        if self.registry.username_taken_by_other(&requested, id) {
            self.send_to_one(
                id,
                &ServerEvent::Notice("Username already in use.".to_string()),
            );
            return;
        }

        let old = match self.registry.get_mut(id) {
            Some(session) => {
                std::mem::replace(&mut session.username, requested.clone())
            }
            None => return,
        };

        tracing::info!(%id, old = %old, new = %requested, "username updated");
        self.send_to_all(&ServerEvent::Broadcast {
            sender: "SERVER".to_string(),
            text: format!("{old} is now {requested}"),
        });
        self.broadcast_roster();
    }

    /// `MSG:ALL:<text>` — relay to every registered session, the
    /// sender included. No registry mutation.
    fn handle_broadcast(&mut self, id: SessionId, text: &str) {
        let sender = self.username_of(id);
        self.send_to_all(&ServerEvent::Broadcast {
            sender,
            text: text.to_string(),
        });
    }

    /// `MSG:<recipient>:<text>` — deliver to every exact-match
    /// recipient, echo a copy to the sender, and notice the sender if
    /// nobody matched. Echo and notice are independent effects.
    fn handle_private(&mut self, id: SessionId, recipient: &str, text: &str) {
        let sender = self.username_of(id);
        let event = ServerEvent::Private {
            sender: sender.clone(),
            recipient: recipient.to_string(),
            text: text.to_string(),
        };

        let matches = self.registry.ids_with_username(recipient);
        for target in &matches {
            self.send_to_one(*target, &event);
        }

        // Echo to the sender — unless they addressed themselves, in
        // which case the delivery above already reached them.
        if sender != recipient {
            self.send_to_one(id, &event);
        }

        if matches.is_empty() {
            self.send_to_one(
                id,
                &ServerEvent::Notice("Recipient not found.".to_string()),
            );
        }
    }

    fn username_of(&self, id: SessionId) -> String {
        self.registry
            .get(id)
            .map(|s| s.username.clone())
            .unwrap_or_default()
    }

    // -- Broadcast / unicast primitives -----------------------------------

    /// Broadcasts the full roster snapshot, in arrival order, to every
    /// registered session. Always the full list, never a delta.
    fn broadcast_roster(&self) {
        self.send_to_all(&ServerEvent::Users(self.registry.usernames()));
    }

    /// Writes one event to every registered session.
    ///
    /// Iterates a point-in-time snapshot of ids; a session that drops
    /// out mid-iteration is skipped by the liveness check in
    /// [`send_to_one`](Self::send_to_one) rather than crashing the loop.
    fn send_to_all(&self, event: &ServerEvent) {
        let bytes = encode_event(event);
        for id in self.registry.ids() {
            self.write(id, bytes.clone());
        }
    }

    /// Writes one event to a single session; silently a no-op if it is
    /// no longer registered.
    fn send_to_one(&self, id: SessionId, event: &ServerEvent) {
        if !self.registry.contains(id) {
            return;
        }
        self.write(id, encode_event(event));
    }

    fn write(&self, id: SessionId, bytes: Vec<u8>) {
        if let Some(outbound) = self.outbound.get(&id) {
            // Fire-and-forget: a closed channel just means the writer
            // task is gone and the disconnect event is on its way.
            let _ = outbound.send(bytes);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
