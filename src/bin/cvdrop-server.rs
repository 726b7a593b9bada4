use anyhow::{Context, Result};
use clap::Parser;
use cvdrop::{
    config::Config,
    logging::init_logging,
    server::{router, AppState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cvdrop-server")]
#[command(about = "Serve the CV upload API over HTTP")]
#[command(version)]
struct Cli {
    /// Config file (defaults to config/settings.toml or ~/.config/cvdrop/settings.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?.with_env_overrides(|key| std::env::var(key).ok()),
        None => Config::load()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if config.server.body_limit_bytes() as u64 <= config.upload.max_file_size_bytes() {
        warn!(
            body_limit_mb = config.server.body_limit_mb,
            max_file_size_mb = config.upload.max_file_size_mb,
            "body limit does not exceed the file size limit, large uploads will be cut off early"
        );
    }

    let state = Arc::new(AppState::new(&config.upload));
    let app = router(state, config.server.body_limit_bytes());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %listener.local_addr()?,
        storage_dir = %config.upload.storage_path().display(),
        "cvdrop server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
