//! # mailcatch
//!
//! mailcatch is a capturing SMTP receiver for inspecting test email
//! traffic, such as alerting pipelines pointed at a local port.
//!
//! It speaks just enough SMTP to accept a message, then parses it and
//! archives one record file per message. It is a test double, not a mail
//! server: anything it does not recognize is acknowledged rather than
//! rejected, so whatever your code sends gets captured.
//!
//! ## Quick Start
//!
//! ```rust
//! use mailcatch::SmtpServer;
//! use std::sync::mpsc;
//! use std::thread;
//! use std::time::Duration;
//!
//! // Create and start the receiver
//! let (tx, rx) = mpsc::channel();
//! let server = SmtpServer::new("catcher.local");
//!
//! thread::spawn(move || {
//!     server.start("127.0.0.1:2525", tx).unwrap();
//! });
//!
//! // Application under test sends email to localhost:2525
//! // ...
//!
//! // Inspect what it sent
//! if let Ok(capture) = rx.recv_timeout(Duration::from_millis(100)) {
//!     println!("From: {}", capture.envelope.from);
//!     println!("Subject: {}", capture.message.subject);
//! }
//! ```
//!
//! ## Wire behavior
//!
//! - `220` greeting on connect, then one response per command line
//! - `HELO`/`EHLO` acknowledged with `250`
//! - `MAIL FROM:` stores the sender, `RCPT TO:` appends a recipient
//! - `DATA` answers `354`; message lines follow until a lone `.`
//! - `QUIT` answers `221` and closes the connection
//! - Any other command is acknowledged with `250`
//!
//! A connection may run several message transactions before `QUIT`; each
//! one becomes an independent capture.
//!
//! ## Captures
//!
//! Every completed message is parsed (Subject, Date, Content-Type,
//! multipart body parts) and delivered on the channel as a [`Capture`].
//! With a capture directory configured, a record file is also written per
//! message, named after the arrival timestamp. A failed write is logged
//! and the capture is still delivered; the client is acknowledged either
//! way.
//!
//! ## Notes
//!
//! - One thread per connection; sessions share no state.
//! - Undecodable bytes are replaced, never fatal.
//! - No STARTTLS, no AUTH, no relaying, no queueing.

mod capture;
mod smtp;

pub use capture::{BodyPart, Capture, CaptureError, CaptureStore, MessageProcessor, ParsedMessage};
pub use smtp::{
    Envelope, SessionState, ShutdownToken, SmtpError, SmtpResponse, SmtpServer, SmtpSession,
};
