use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use mailcatch::{Capture, ShutdownToken, SmtpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mailcatch", version, about = "Capturing SMTP receiver for test email traffic")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind. Mail submission uses 587; ports below 1024 need
    /// elevated privilege.
    #[arg(long, default_value_t = 587)]
    port: u16,

    /// Hostname announced in the SMTP greeting
    #[arg(long, default_value = "mailcatch.local")]
    hostname: String,

    /// Directory where capture record files are written
    #[arg(long, default_value = "captures")]
    capture_dir: PathBuf,

    /// Idle read timeout per connection in seconds; 0 disables it
    #[arg(long, default_value_t = 300)]
    read_timeout: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    let read_timeout = (args.read_timeout > 0).then(|| Duration::from_secs(args.read_timeout));
    let server = SmtpServer::new(&args.hostname)
        .with_capture_dir(&args.capture_dir)
        .with_read_timeout(read_timeout);

    let shutdown = ShutdownToken::new();
    let interrupt_token = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("interrupt received, shutting down");
        interrupt_token.shutdown();
    }) {
        error!(error = %e, "failed to install interrupt handler");
        std::process::exit(1);
    }

    let (tx, rx) = mpsc::channel::<Capture>();
    thread::spawn(move || {
        let mut count = 0usize;
        while let Ok(capture) = rx.recv() {
            count += 1;
            info!("capture #{count}\n{capture}");
        }
    });

    let listener = match TcpListener::bind(&addr) {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind listening socket");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.start_with_listener(listener, tx, shutdown) {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
