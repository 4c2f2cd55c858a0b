//! pdfmerge-api - HTTP service that merges uploaded PDF files.

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pdfmerge::cli::Cli;
use pdfmerge::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose {
        "pdfmerge=debug,pdfmerge_api=debug,tower_http=debug"
    } else {
        "pdfmerge=info,pdfmerge_api=info,tower_http=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::try_from(&cli)?;

    info!("{} v{}", pdfmerge::NAME, pdfmerge::VERSION);
    info!(
        origin = ?config.allowed_origin,
        temp_dir = %config.temp_dir.display(),
        max_file_size = %config.limits.max_file_size_label(),
        max_request_size = %config.limits.max_request_size_label(),
        "Configuration loaded"
    );

    let app = pdfmerge::server::router(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
