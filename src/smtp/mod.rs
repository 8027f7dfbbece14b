//! SMTP receiver implementation

pub mod commands;
pub mod envelope;
pub mod error;
pub mod response;
pub mod server;
pub mod session;

pub use envelope::Envelope;
pub use error::SmtpError;
pub use response::SmtpResponse;
pub use server::{ShutdownToken, SmtpServer};
pub use session::{SessionState, SmtpSession};
