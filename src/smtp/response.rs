//! SMTP response handling

/// Represents an SMTP response that can be sent to a client
#[derive(Debug, Clone)]
pub struct SmtpResponse {
    /// The SMTP response code (e.g., "250", "354", "221")
    pub code: &'static str,
    /// The human-readable message
    pub message: String,
}

impl SmtpResponse {
    /// Create a new SMTP response
    pub fn new(code: &'static str, message: &str) -> Self {
        Self {
            code,
            message: message.to_owned(),
        }
    }

    /// Create a generic success response (250 OK)
    pub fn ok() -> Self {
        Self::new("250", "OK")
    }

    /// Create the connection greeting (220)
    pub fn greeting(hostname: &str) -> Self {
        Self::new("220", &format!("{hostname} mailcatch service ready"))
    }

    /// Create a HELO/EHLO acknowledgment (250)
    pub fn hello(hostname: &str) -> Self {
        Self::new("250", &format!("{hostname} Hello"))
    }

    /// Create a DATA intermediate response (354)
    pub fn data_start() -> Self {
        Self::new("354", "Start mail input; end with <CRLF>.<CRLF>")
    }

    /// Create the end-of-data acceptance response (250)
    pub fn accepted() -> Self {
        Self::new("250", "OK Message accepted")
    }

    /// Create a QUIT response (221)
    pub fn quit() -> Self {
        Self::new("221", "Bye")
    }

    /// Format the response for sending over the wire
    pub fn format(&self) -> String {
        format!("{} {}\r\n", self.code, self.message)
    }

    /// Check if this is a success response (2xx)
    pub fn is_success(&self) -> bool {
        self.code.starts_with('2')
    }

    /// Check if this is an intermediate response (3xx)
    pub fn is_intermediate(&self) -> bool {
        self.code.starts_with('3')
    }
}
