//! Health overview endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::error::ApiResult;
use crate::models::HealthOverview;
use crate::services::{build_overview, generate_health_scores};
use crate::AppState;

/// GET /api/health-overview
pub async fn health_overview(State(state): State<AppState>) -> ApiResult<Json<HealthOverview>> {
    let scores = generate_health_scores(&mut rand::thread_rng());
    let overview = build_overview(&state.db, scores).await?;
    Ok(Json(overview))
}

pub fn overview_routes() -> Router<AppState> {
    Router::new().route("/health-overview", get(health_overview))
}
