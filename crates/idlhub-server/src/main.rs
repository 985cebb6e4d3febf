use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use idlhub_core::storage::FileStorage;
use idlhub_server::state::AppState;

#[derive(Parser)]
#[command(
    name = "idlhub-server",
    version,
    about = "Stores and serves versioned IDL bundles"
)]
struct Args {
    /// The port to host the server on
    #[arg(short, long, default_value_t = 80)]
    port: u16,

    /// The storage location for uploaded bundles
    #[arg(short, long, default_value = "/var/idl-repository")]
    storage: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let storage =
        FileStorage::new(&args.storage).context("failed opening the storage directory")?;
    let app = idlhub_server::app(AppState::new(Arc::new(storage)));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, storage = %args.storage.display(), "idlhub server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve http")?;

    Ok(())
}

/// Resolve when the process is asked to stop; in-flight streaming copies
/// are allowed to finish on their own.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed installing shutdown handler");
    }
}
