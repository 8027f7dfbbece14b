//! Implementation of SMTP commands
//!
//! The handler is deliberately permissive: anything it does not recognize is
//! acknowledged with 250 rather than rejected. The receiver exists to
//! capture test traffic, not to enforce protocol conformance.

use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;

/// Handles SMTP command lines and returns the response to send
#[derive(Debug)]
pub struct SmtpCommandHandler<'a> {
    hostname: &'a str,
}

impl<'a> SmtpCommandHandler<'a> {
    /// Create a new command handler
    pub fn new(hostname: &'a str) -> Self {
        Self { hostname }
    }

    /// Process one command line, updating the session state as a side
    /// effect. Verbs are matched case-insensitively.
    pub fn process_command(&self, line: &str, session: &mut SmtpSession) -> SmtpResponse {
        let upper = line.to_uppercase();

        if upper.starts_with("HELO") || upper.starts_with("EHLO") {
            SmtpResponse::hello(self.hostname)
        } else if upper.starts_with("MAIL FROM:") {
            session.set_sender(&extract_address(line));
            SmtpResponse::ok()
        } else if upper.starts_with("RCPT TO:") {
            session.add_recipient(&extract_address(line));
            SmtpResponse::ok()
        } else if upper == "DATA" {
            session.begin_data();
            SmtpResponse::data_start()
        } else if upper == "QUIT" {
            session.close();
            SmtpResponse::quit()
        } else {
            SmtpResponse::ok()
        }
    }
}

/// Extract the address argument of a MAIL FROM / RCPT TO command: everything
/// after the first `:`, with surrounding whitespace and angle brackets
/// stripped.
fn extract_address(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or("")
        .trim()
        .trim_matches(['<', '>'])
        .to_owned()
}
