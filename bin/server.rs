// Currency Basics - API Server binary
// Static currency lists over a JSON REST API (Axum)

use anyhow::{Context, Result};
use clap::Parser;
use currency_basics::config::ServerArgs;
use currency_basics::logging::{self, LogTarget};
use currency_basics::server::{probe_data_files, serve};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    logging::init(LogTarget::Stderr)?;

    info!("Starting Currency API Server...");
    args.validate()?;

    info!(data_dir = %args.data_dir.display(), "Testing file access...");
    probe_data_files(&args.data_dir).await;

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", args.bind))?;

    let port = args.bind.port();
    info!("Currency API Server is running on http://localhost:{}", port);
    info!("Available endpoints:");
    info!("   GET / - Server info");
    info!("   GET /api/health - Health check");
    info!("   GET /api/currencies/crypto - Get crypto currencies");
    info!("   GET /api/currencies/fiat - Get fiat currencies");
    info!("   GET /api/currencies/all - Get all currencies");

    serve(listener, args.data_dir)
        .await
        .context("Server stopped unexpectedly")
}
