//! SMTP session state management

use std::net::SocketAddr;

use chrono::Local;

use crate::smtp::envelope::Envelope;

/// Represents the current state of an SMTP session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection accepted, greeting not yet sent
    Greeting,
    /// Reading commands one line at a time
    Command,
    /// Collecting message data until the lone `.` terminator
    Data,
    /// Terminal: QUIT received or the connection was lost
    Closed,
}

/// Per-connection state. Owned exclusively by the handler thread of one
/// connection; never shared across sessions.
#[derive(Debug)]
pub struct SmtpSession {
    /// Remote address of the connected client
    pub peer: SocketAddr,
    /// Current state of the session
    pub state: SessionState,
    /// Sender address from the most recent MAIL FROM command
    pub from: String,
    /// Recipient addresses in the order declared, duplicates kept
    pub to: Vec<String>,
    /// Message lines collected during data mode
    body: Vec<String>,
}

impl SmtpSession {
    /// Create a new session for an accepted connection
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            state: SessionState::Greeting,
            from: String::new(),
            to: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Mark the greeting as sent; the session starts reading commands
    pub fn greeted(&mut self) {
        self.state = SessionState::Command;
    }

    /// Store the sender address, replacing any prior value for this
    /// transaction
    pub fn set_sender(&mut self, sender: &str) {
        self.from = sender.to_owned();
    }

    /// Append a recipient address. Order is preserved and duplicates are
    /// kept.
    pub fn add_recipient(&mut self, recipient: &str) {
        self.to.push(recipient.to_owned());
    }

    /// Enter data mode, discarding any previously collected body
    pub fn begin_data(&mut self) {
        self.body.clear();
        self.state = SessionState::Data;
    }

    /// Append one message line received during data mode
    pub fn push_body_line(&mut self, line: &str) {
        self.body.push(line.to_owned());
    }

    /// Complete the current transaction: build an envelope from the
    /// accumulated state, clear it for the next transaction, and return to
    /// command mode.
    pub fn take_envelope(&mut self) -> Envelope {
        let envelope = Envelope {
            from: std::mem::take(&mut self.from),
            to: std::mem::take(&mut self.to),
            body: self.body.join("\n"),
            peer: self.peer,
            timestamp: Local::now(),
        };
        self.body.clear();
        self.state = SessionState::Command;
        envelope
    }

    /// Mark the session closed. Terminal; the handler releases the
    /// connection.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }
}
