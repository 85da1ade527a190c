//! eniguity-diag library interface
//!
//! Exposes the router and state for the binary and integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::UploadStager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Staging area for uploaded audio
    pub stager: UploadStager,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last server-side failure, reported by /health
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, stager: UploadStager) -> Self {
        Self {
            db,
            stager,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn record_error(&self, message: impl Into<String>) {
        *self.last_error.write().await = Some(message.into());
    }
}

/// Build application router
///
/// Application routes live under `/api`; `/health` stays at the root.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let api_routes = Router::new()
        .merge(api::analysis_routes())
        .merge(api::overview_routes())
        .merge(api::vehicle_routes());

    Router::new()
        .merge(api::root_routes())
        .nest("/api", api_routes)
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
