//! Wire message types for the relay protocol.
//!
//! Inbound, clients speak four commands; outbound, the relay speaks
//! four events. Anything else a client sends is silently ignored —
//! that is compatibility behavior inherited from the protocol's first
//! implementation, not an omission.

use std::fmt;

// ---------------------------------------------------------------------------
// Inbound commands
// ---------------------------------------------------------------------------

/// An inbound command, parsed from one complete line.
///
/// See [`parse_command`](crate::parse_command) for the grammar. Lines
/// that match no variant produce no command, no error, and no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `CONNECT:<username>` — claim a username for this session.
    Connect {
        /// The requested username.
        username: String,
    },

    /// `CHANGE_NAME:<username>` — request a rename.
    ChangeName {
        /// The requested new username.
        username: String,
    },

    /// `MSG:ALL:<text>` — broadcast to every connected session.
    Broadcast {
        /// The message body.
        text: String,
    },

    /// `MSG:<recipient>:<text>` — private message to a named session.
    ///
    /// Only the first colon after the recipient splits, so the text may
    /// itself contain colons.
    Private {
        /// Exact username the message is addressed to.
        recipient: String,
        /// The message body.
        text: String,
    },
}

// ---------------------------------------------------------------------------
// Outbound events
// ---------------------------------------------------------------------------

/// An outbound event, rendered to one wire line.
///
/// `Display` produces the line without the terminator;
/// [`encode_event`](crate::encode_event) appends the trailing `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `USERS:<comma-joined usernames>` — full roster snapshot in
    /// connection-arrival order. Always the complete list, never a
    /// delta. Unnamed sessions contribute an empty field.
    Users(Vec<String>),

    /// `MSG:<sender>:ALL:<text>` — a broadcast chat message.
    Broadcast {
        /// Username of the sending session (empty if unnamed).
        sender: String,
        /// The message body.
        text: String,
    },

    /// `MSG:<sender>:<recipient>:<text>` — a private chat message,
    /// delivered to matching recipients and echoed to the sender.
    Private {
        /// Username of the sending session (empty if unnamed).
        sender: String,
        /// Username the message was addressed to.
        recipient: String,
        /// The message body.
        text: String,
    },

    /// `SERVER:<text>` — a system notice addressed to one session.
    Notice(String),
}

impl fmt::Display for ServerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Users(names) => write!(f, "USERS:{}", names.join(",")),
            Self::Broadcast { sender, text } => {
                write!(f, "MSG:{sender}:ALL:{text}")
            }
            Self::Private {
                sender,
                recipient,
                text,
            } => write!(f, "MSG:{sender}:{recipient}:{text}"),
            Self::Notice(text) => write!(f, "SERVER:{text}"),
        }
    }
}
