//! eniguity-diag - Vehicle audio diagnostics service
//!
//! Accepts recordings of vehicle noise, extracts spectral features and
//! returns a rule-based diagnosis. Results and vehicle profiles are kept in
//! a local SQLite database.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use eniguity_diag::config::{Args, ServiceConfig};
use eniguity_diag::services::UploadStager;
use eniguity_diag::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::load(args).context("Failed to resolve configuration")?;

    // RUST_LOG overrides the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "Starting Eniguity Diagnostics (eniguity-diag) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Root folder: {}", config.root_folder.display());
    info!("Upload staging: {}", config.upload_dir.display());

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload dir {}", config.upload_dir.display()))?;

    let db_pool = eniguity_diag::db::init_database_pool(&config.database_url)
        .await
        .context("Failed to open database")?;
    info!("Database connection established");

    let state = AppState::new(db_pool, UploadStager::new(&config.upload_dir));
    let app = build_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
