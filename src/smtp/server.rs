//! SMTP receiver: accept loop and per-connection session handling

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capture::{Capture, CaptureStore, MessageProcessor};
use crate::smtp::commands::SmtpCommandHandler;
use crate::smtp::error::SmtpError;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::{SessionState, SmtpSession};

/// Cooperative shutdown signal for the accept loop.
///
/// Cloned handles share the same signal. Triggering it stops the acceptor
/// from taking new connections; sessions already in flight drain on their
/// own, bounded by the read timeout. The listening socket closes exactly
/// once, when the accept loop returns.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug, Default)]
struct TokenInner {
    stop: AtomicBool,
    addr: OnceLock<SocketAddr>,
}

impl ShutdownToken {
    /// Create a new, untriggered token
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal shutdown. Wakes the acceptor with a throwaway connection so a
    /// blocked `accept` observes the signal promptly.
    pub fn shutdown(&self) {
        self.inner.stop.store(true, Ordering::SeqCst);
        if let Some(addr) = self.inner.addr.get() {
            let _ = TcpStream::connect_timeout(addr, Duration::from_secs(1));
        }
    }

    /// Whether shutdown has been signalled
    pub fn is_shutdown(&self) -> bool {
        self.inner.stop.load(Ordering::SeqCst)
    }

    fn register(&self, addr: SocketAddr) {
        let _ = self.inner.addr.set(addr);
    }
}

/// Capturing SMTP receiver.
///
/// Accepts connections, runs each session on its own thread, and delivers
/// every completed message as a [`Capture`] over the channel supplied at
/// start. Sessions share no state; a failure in one never affects another.
#[derive(Debug, Clone)]
pub struct SmtpServer {
    /// Hostname announced in the greeting
    hostname: String,
    /// Where capture records are written; `None` disables persistence
    capture_dir: Option<PathBuf>,
    /// Idle read timeout per connection; `None` waits forever
    read_timeout: Option<Duration>,
}

/// Default idle timeout before an abandoned connection is released
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(300);

impl SmtpServer {
    /// Create a new receiver announcing `hostname`
    pub fn new(hostname: &str) -> Self {
        Self {
            hostname: hostname.to_owned(),
            capture_dir: None,
            read_timeout: Some(DEFAULT_READ_TIMEOUT),
        }
    }

    /// Persist one capture record per message under `dir`
    pub fn with_capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.capture_dir = Some(dir.into());
        self
    }

    /// Override the idle read timeout. `None` disables it.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Bind `addr` and run the accept loop (blocking).
    ///
    /// Binding failures are fatal and carry the offending address; the
    /// accept loop is never entered.
    pub fn start(&self, addr: &str, tx: mpsc::Sender<Capture>) -> Result<(), SmtpError> {
        let listener = TcpListener::bind(addr).map_err(|source| SmtpError::Bind {
            addr: addr.to_owned(),
            source,
        })?;
        self.start_with_listener(listener, tx, ShutdownToken::new())
    }

    /// Run the accept loop on an existing listener (blocking) until the
    /// shutdown token is triggered.
    pub fn start_with_listener(
        &self,
        listener: TcpListener,
        tx: mpsc::Sender<Capture>,
        shutdown: ShutdownToken,
    ) -> Result<(), SmtpError> {
        if let Ok(addr) = listener.local_addr() {
            shutdown.register(addr);
            info!(%addr, "SMTP receiver listening");
        }

        let store = match &self.capture_dir {
            Some(dir) => Some(CaptureStore::open(dir)?),
            None => None,
        };
        let processor = Arc::new(MessageProcessor::new(store));

        for stream in listener.incoming() {
            if shutdown.is_shutdown() {
                break;
            }
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    let processor = Arc::clone(&processor);
                    let tx = tx.clone();
                    thread::spawn(move || {
                        if let Err(e) = server.handle_client(stream, &processor, &tx) {
                            debug!(error = %e, "session ended with error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "error accepting connection");
                }
            }
        }

        info!("SMTP receiver stopped accepting connections");
        Ok(())
    }

    /// Drive one session over its connection. Runs on a dedicated thread;
    /// owns the connection exclusively.
    fn handle_client(
        &self,
        mut stream: TcpStream,
        processor: &MessageProcessor,
        tx: &mpsc::Sender<Capture>,
    ) -> Result<(), SmtpError> {
        let peer = stream.peer_addr()?;
        debug!(%peer, "connection accepted");

        stream.set_read_timeout(self.read_timeout)?;
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut session = SmtpSession::new(peer);
        let command_handler = SmtpCommandHandler::new(&self.hostname);

        self.send_response(&mut stream, &SmtpResponse::greeting(&self.hostname))?;
        session.greeted();

        let mut line_buffer = Vec::new();
        while session.state != SessionState::Closed {
            line_buffer.clear();

            // One read may carry several lines or a fragment of one;
            // BufReader assembles complete lines either way.
            match reader.read_until(b'\n', &mut line_buffer) {
                Ok(0) => {
                    debug!(%peer, "connection closed by client");
                    session.close();
                }
                Ok(_) => {
                    // Undecodable bytes are substituted, never fatal.
                    let text = String::from_utf8_lossy(&line_buffer);
                    let line = text.trim_end_matches(['\r', '\n']);
                    debug!(%peer, line, "received");

                    match session.state {
                        SessionState::Data => {
                            if line == "." {
                                let envelope = session.take_envelope();
                                let capture = processor.process(envelope);
                                // Errors when there are no listeners; fine,
                                // the record and logs still exist.
                                let _ = tx.send(capture);
                                self.send_response(&mut stream, &SmtpResponse::accepted())?;
                            } else {
                                session.push_body_line(line);
                            }
                        }
                        _ => {
                            if line.is_empty() {
                                continue;
                            }
                            let response = command_handler.process_command(line, &mut session);
                            self.send_response(&mut stream, &response)?;
                        }
                    }
                }
                Err(e) => {
                    debug!(%peer, error = %e, "read failed, closing session");
                    session.close();
                }
            }
        }

        debug!(%peer, "session finished");
        Ok(())
    }

    /// Send a response line to the client
    fn send_response(
        &self,
        stream: &mut TcpStream,
        response: &SmtpResponse,
    ) -> Result<(), SmtpError> {
        stream.write_all(response.format().as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}
