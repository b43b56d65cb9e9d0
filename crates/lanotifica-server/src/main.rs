//! LaNotifica relay: entry point.
//!
//! Receives notifications posted by the paired Android app over HTTPS and
//! hands them to the desktop.
//!
//! # Usage
//!
//! ```text
//! lanotifica [OPTIONS]
//!
//! Options:
//!   --config-dir <DIR>   Configuration directory
//!                        [env: LANOTIFICA_CONFIG_DIR]
//!                        [default: $XDG_CONFIG_HOME/lanotifica or ~/.config/lanotifica]
//! ```
//!
//! # What happens at startup
//!
//! 1. Logging is initialised from `RUST_LOG` (default `info`).
//! 2. `config.json` and the TLS identity are loaded or created.  Failure here
//!    aborts with a non-zero exit status.
//! 3. The relay is advertised over mDNS.  Failure here only logs a warning.
//! 4. The HTTPS server runs until SIGINT or SIGTERM, which withdraws the
//!    advertisement and then drains in-flight requests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum_server::Handle;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lanotifica_server::application::send_notification::SendNotificationUseCase;
use lanotifica_server::infrastructure::bootstrap::ServerContext;
use lanotifica_server::infrastructure::http::{build_router, serve, HttpState, HttpTimeouts};
use lanotifica_server::infrastructure::network::discovery::ServiceAdvertiser;
use lanotifica_server::infrastructure::notify::LogNotifier;
use lanotifica_server::infrastructure::storage::paths::ConfigPaths;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// LaNotifica notification relay.
#[derive(Debug, Parser)]
#[command(
    name = "lanotifica",
    about = "Forwards Android notifications to the desktop over a paired TLS channel",
    version
)]
struct Cli {
    /// Directory holding config.json, cert.pem and key.pem.
    #[arg(long, env = "LANOTIFICA_CONFIG_DIR")]
    config_dir: Option<PathBuf>,
}

impl Cli {
    fn config_paths(&self) -> anyhow::Result<ConfigPaths> {
        match &self.config_dir {
            Some(dir) => Ok(ConfigPaths::new(dir.clone())),
            None => ConfigPaths::from_env().context("no configuration directory"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let context = ServerContext::bootstrap(cli.config_paths()?)?;

    let addr = context.config.listen_addr()?;
    let port = context.config.port_number()?;

    let advertiser = ServiceAdvertiser::start_or_disabled(port);
    if !advertiser.is_running() {
        info!("phones must be pointed at this host's IP address manually");
    }

    let notifications = SendNotificationUseCase::new(Arc::new(LogNotifier));
    let state = HttpState::new(notifications, &context.pairing_image);
    let router = build_router(
        context.auth_gate(),
        state,
        HttpTimeouts::from_config(&context.config),
    );

    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(
        handle.clone(),
        advertiser,
        context.config.write_timeout(),
    ));

    info!("open https://localhost:{port} in your browser to see the pairing QR code");
    serve(addr, &context.identity, router, handle)
        .await
        .with_context(|| format!("HTTPS server on {addr} failed"))?;

    info!("LaNotifica relay stopped");
    Ok(())
}

/// Waits for SIGINT or SIGTERM, withdraws the advertisement, then asks the
/// server to drain for at most `grace`.
async fn shutdown_on_signal(handle: Handle, mut advertiser: ServiceAdvertiser, grace: Duration) {
    if let Err(e) = wait_for_signal().await {
        error!("failed to listen for shutdown signals: {e}");
        return;
    }
    info!("shutting down");
    advertiser.stop();
    handle.graceful_shutdown(Some(grace));
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
