//! Message envelope built from a completed SMTP transaction

use std::net::SocketAddr;

use chrono::{DateTime, Local};

/// One completed message transaction as received on the wire.
///
/// Built once when the client terminates data mode; immutable afterwards.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// The sender address from MAIL FROM
    pub from: String,

    /// Recipient addresses from RCPT TO, in declared order
    pub to: Vec<String>,

    /// The raw message content, headers and body, newline-joined
    pub body: String,

    /// Remote address of the submitting client
    pub peer: SocketAddr,

    /// When the message transaction completed
    pub timestamp: DateTime<Local>,
}

impl Envelope {
    /// Check if this message was addressed to a specific recipient
    pub fn has_recipient(&self, recipient: &str) -> bool {
        self.to.iter().any(|addr| addr == recipient)
    }

    /// Check if this message was declared from a specific sender
    pub fn is_from_sender(&self, sender: &str) -> bool {
        self.from == sender
    }

    /// Recipients joined with ", " for display and persistence
    pub fn recipients_joined(&self) -> String {
        self.to.join(", ")
    }
}
