//! Vehicle profile endpoints
//!
//! POST /api/vehicle, GET /api/vehicles

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::db;
use crate::error::ApiResult;
use crate::models::{CreateVehicleRequest, VehicleProfile};
use crate::AppState;

/// POST /api/vehicle
///
/// Malformed bodies are rejected by the JSON extractor before this runs.
pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> ApiResult<Json<VehicleProfile>> {
    let vehicle = VehicleProfile::new(request);
    db::vehicles::save_vehicle(&state.db, &vehicle).await?;

    tracing::info!(id = %vehicle.id, make = %vehicle.make, model = %vehicle.model, "Vehicle created");

    Ok(Json(vehicle))
}

/// GET /api/vehicles
pub async fn list_vehicles(State(state): State<AppState>) -> ApiResult<Json<Vec<VehicleProfile>>> {
    let vehicles = db::vehicles::list_vehicles(&state.db, db::vehicles::VEHICLE_LIMIT).await?;
    Ok(Json(vehicles))
}

pub fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route("/vehicle", post(create_vehicle))
        .route("/vehicles", get(list_vehicles))
}
