//! Error types for the SMTP receiver

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmtpError {
    /// The listening socket could not be bound. Fatal: the server never
    /// enters its accept loop.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// I/O failure on an accepted connection. Scoped to one session; the
    /// acceptor and all other sessions keep running.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The capture store could not be opened at startup
    #[error(transparent)]
    Capture(#[from] crate::capture::CaptureError),
}
