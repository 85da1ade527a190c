//! Vehicle profile data structures

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /vehicle request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i64,
}

/// Stored vehicle profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub mileage: i64,
    pub created_at: DateTime<Utc>,
}

impl VehicleProfile {
    /// Microsecond timestamp so the record reads back unchanged
    pub fn new(request: CreateVehicleRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            make: request.make,
            model: request.model,
            year: request.year,
            mileage: request.mileage,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}
