//! API banner

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

pub const API_BANNER: &str = "Eniguity Diagnostics API v1.0";

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

/// GET /api and /api/
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse { message: API_BANNER })
}

/// Banner routes, registered on the outer router so both slash forms match
pub fn root_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
}
