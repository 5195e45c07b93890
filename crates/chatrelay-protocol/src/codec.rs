//! Line framing, command parsing, and event serialization.
//!
//! The transport hands over arbitrary byte chunks; [`LineDecoder`]
//! reassembles them into complete `\n`-terminated lines, keeping any
//! partial tail buffered for the next delivery. Splitting a stream at
//! any chunk boundary yields exactly the same line sequence as feeding
//! it in one piece.

use crate::{Command, ServerEvent};

/// Incremental line framer for one session's inbound byte stream.
///
/// Owned exclusively by the session it frames for, and dropped with
/// that session on disconnect — which is what discards a half-received
/// line from a client that went away mid-command.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Creates an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one transport delivery to the buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Pops the next complete line, or `None` if no terminator is
    /// buffered yet.
    ///
    /// The terminator and any trailing `\r` or whitespace are stripped.
    /// Bytes are decoded as UTF-8; invalid sequences degrade to the
    /// replacement character rather than failing the session.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=pos).collect();
        Some(String::from_utf8_lossy(&line).trim_end().to_string())
    }

    /// Returns `true` if no bytes are currently buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Parses one complete line into a [`Command`].
///
/// Returns `None` for anything that is not a recognized command:
/// unknown prefixes are dropped without a response (a compatibility
/// rule, so newer clients can talk to older relays), and a `MSG:` with
/// no recipient/text separator is likewise dropped.
pub fn parse_command(line: &str) -> Option<Command> {
    if let Some(username) = line.strip_prefix("CONNECT:") {
        return Some(Command::Connect {
            username: username.to_string(),
        });
    }
    if let Some(username) = line.strip_prefix("CHANGE_NAME:") {
        return Some(Command::ChangeName {
            username: username.to_string(),
        });
    }
    if let Some(text) = line.strip_prefix("MSG:ALL:") {
        return Some(Command::Broadcast {
            text: text.to_string(),
        });
    }
    if let Some(rest) = line.strip_prefix("MSG:") {
        // Recipient and text split on the FIRST remaining colon only,
        // so the text may contain colons of its own.
        let (recipient, text) = rest.split_once(':')?;
        return Some(Command::Private {
            recipient: recipient.to_string(),
            text: text.to_string(),
        });
    }
    None
}

/// Serializes an outbound event into wire bytes, appending the line
/// terminator.
pub fn encode_event(event: &ServerEvent) -> Vec<u8> {
    let mut bytes = event.to_string().into_bytes();
    bytes.push(b'\n');
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- LineDecoder ------------------------------------------------------

    /// Drains every complete line currently buffered.
    fn drain(decoder: &mut LineDecoder) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = decoder.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_next_line_returns_none_without_terminator() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"CONNECT:ali");
        assert_eq!(decoder.next_line(), None);
        assert!(!decoder.is_empty(), "partial data stays buffered");
    }

    #[test]
    fn test_next_line_strips_terminator_and_carriage_return() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"CONNECT:alice\r\n");
        assert_eq!(decoder.next_line().as_deref(), Some("CONNECT:alice"));
        assert!(decoder.is_empty());
    }

    #[test]
    fn test_next_line_strips_trailing_whitespace_only() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"MSG:ALL:hi  \n");
        // Trailing whitespace goes; interior whitespace stays.
        assert_eq!(decoder.next_line().as_deref(), Some("MSG:ALL:hi"));
    }

    #[test]
    fn test_partial_line_completed_by_next_delivery() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"CONN");
        assert_eq!(decoder.next_line(), None);
        decoder.push(b"ECT:alice\n");
        assert_eq!(decoder.next_line().as_deref(), Some("CONNECT:alice"));
    }

    #[test]
    fn test_multiple_lines_in_one_delivery_emitted_in_order() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"CONNECT:alice\nMSG:ALL:hello\nMSG:bob:hi\n");
        assert_eq!(
            drain(&mut decoder),
            vec!["CONNECT:alice", "MSG:ALL:hello", "MSG:bob:hi"]
        );
    }

    #[test]
    fn test_chunking_is_invisible_to_framing() {
        // Feeding the stream byte-by-byte must yield the same lines as
        // feeding it whole.
        let stream = b"CONNECT:alice\r\nMSG:ALL:hi there\nMSG:bob:tail";

        let mut whole = LineDecoder::new();
        whole.push(stream);
        let expected = drain(&mut whole);

        let mut chunked = LineDecoder::new();
        let mut got = Vec::new();
        for byte in stream {
            chunked.push(&[*byte]);
            got.extend(drain(&mut chunked));
        }

        assert_eq!(got, expected);
        assert_eq!(expected, vec!["CONNECT:alice", "MSG:ALL:hi there"]);
        // Both keep the unterminated tail buffered.
        assert!(!whole.is_empty());
        assert!(!chunked.is_empty());
    }

    #[test]
    fn test_invalid_utf8_degrades_instead_of_failing() {
        let mut decoder = LineDecoder::new();
        decoder.push(b"MSG:ALL:\xff\xfe\n");
        let line = decoder.next_line().expect("line should frame");
        assert!(line.starts_with("MSG:ALL:"));
    }

    // -- parse_command ----------------------------------------------------

    #[test]
    fn test_parse_connect() {
        assert_eq!(
            parse_command("CONNECT:alice"),
            Some(Command::Connect {
                username: "alice".to_string()
            })
        );
    }

    #[test]
    fn test_parse_change_name() {
        assert_eq!(
            parse_command("CHANGE_NAME:bob"),
            Some(Command::ChangeName {
                username: "bob".to_string()
            })
        );
    }

    #[test]
    fn test_parse_broadcast_takes_precedence_over_private() {
        // "ALL" is a reserved recipient: MSG:ALL:<text> is a broadcast,
        // never a private message to a user named ALL.
        assert_eq!(
            parse_command("MSG:ALL:hello everyone"),
            Some(Command::Broadcast {
                text: "hello everyone".to_string()
            })
        );
    }

    #[test]
    fn test_parse_private_splits_on_first_colon_only() {
        assert_eq!(
            parse_command("MSG:bob:meet at 10:30:00"),
            Some(Command::Private {
                recipient: "bob".to_string(),
                text: "meet at 10:30:00".to_string()
            })
        );
    }

    #[test]
    fn test_parse_private_without_separator_is_ignored() {
        // No second colon means no recipient/text split — not a command.
        assert_eq!(parse_command("MSG:bob"), None);
    }

    #[test]
    fn test_parse_private_allows_empty_recipient() {
        // "MSG::hi" addresses the empty username, i.e. unnamed sessions.
        assert_eq!(
            parse_command("MSG::hi"),
            Some(Command::Private {
                recipient: String::new(),
                text: "hi".to_string()
            })
        );
    }

    #[test]
    fn test_parse_unknown_prefix_is_ignored() {
        assert_eq!(parse_command("HELLO:world"), None);
        assert_eq!(parse_command("connect:alice"), None); // case-sensitive
        assert_eq!(parse_command(""), None);
    }

    // -- encode_event -----------------------------------------------------

    #[test]
    fn test_encode_appends_single_terminator() {
        let bytes = encode_event(&ServerEvent::Notice(
            "Username already in use.".to_string(),
        ));
        assert_eq!(bytes, b"SERVER:Username already in use.\n");
    }

    #[test]
    fn test_encode_then_reframe_round_trips_the_line() {
        let event = ServerEvent::Broadcast {
            sender: "alice".to_string(),
            text: "hello".to_string(),
        };
        let mut decoder = LineDecoder::new();
        decoder.push(&encode_event(&event));
        assert_eq!(decoder.next_line().as_deref(), Some("MSG:alice:ALL:hello"));
    }
}
