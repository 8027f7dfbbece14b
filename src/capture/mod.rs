//! Message processing: parsing and archival of completed transactions

pub mod message;
pub mod store;

use std::fmt;
use std::path::PathBuf;

use tracing::{info, warn};

pub use message::{BodyPart, ParsedMessage};
pub use store::{CaptureError, CaptureStore};

use crate::smtp::Envelope;

/// The outcome of processing one completed message transaction
#[derive(Debug, Clone)]
pub struct Capture {
    /// The envelope as received on the wire
    pub envelope: Envelope,
    /// Headers and body parts extracted from the raw transcript
    pub message: ParsedMessage,
    /// Where the capture record was written, if persistence succeeded
    pub record_path: Option<PathBuf>,
}

impl fmt::Display for Capture {
    /// Human-readable summary. Producible whether or not persistence
    /// succeeded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From: {}", self.envelope.from)?;
        writeln!(f, "To: {}", self.envelope.recipients_joined())?;
        writeln!(f, "Subject: {}", self.message.subject)?;
        writeln!(f, "Date: {}", self.message.date)?;
        writeln!(f, "Content-Type: {}", self.message.content_type)?;
        writeln!(f, "{}", "-".repeat(30))?;
        write!(f, "{}", self.message.text_body())
    }
}

/// Turns envelopes into captures: parse, persist, report.
///
/// Invoked synchronously from the session handler that completed the
/// message, so each call runs on that session's own thread.
#[derive(Debug)]
pub struct MessageProcessor {
    store: Option<CaptureStore>,
}

impl MessageProcessor {
    /// Create a processor. With no store, captures are kept in memory only.
    pub fn new(store: Option<CaptureStore>) -> Self {
        Self { store }
    }

    /// Process one completed transaction.
    ///
    /// A persistence failure is reported as a warning and leaves
    /// `record_path` empty; the parsed message and summary are produced
    /// regardless.
    pub fn process(&self, envelope: Envelope) -> Capture {
        let message = ParsedMessage::parse(&envelope.body);

        let record_path = match &self.store {
            Some(store) => match store.write(&envelope) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "could not persist capture record");
                    None
                }
            },
            None => None,
        };

        info!(
            from = %envelope.from,
            to = %envelope.recipients_joined(),
            subject = %message.subject,
            record = ?record_path,
            "captured message"
        );

        Capture {
            envelope,
            message,
            record_path,
        }
    }
}
