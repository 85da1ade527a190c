//! Vehicle profile persistence

use eniguity_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp};
use crate::models::VehicleProfile;

/// Vehicle listing page size
pub const VEHICLE_LIMIT: i64 = 100;

/// Save vehicle profile to database
pub async fn save_vehicle(pool: &SqlitePool, vehicle: &VehicleProfile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO vehicle_profiles (id, make, model, year, mileage, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(vehicle.id.to_string())
    .bind(&vehicle.make)
    .bind(&vehicle.model)
    .bind(vehicle.year)
    .bind(vehicle.mileage)
    .bind(format_timestamp(&vehicle.created_at))
    .execute(pool)
    .await?;

    tracing::debug!(id = %vehicle.id, make = %vehicle.make, model = %vehicle.model, "Vehicle saved");

    Ok(())
}

/// Stored vehicles in insertion order
pub async fn list_vehicles(pool: &SqlitePool, limit: i64) -> Result<Vec<VehicleProfile>> {
    let rows = sqlx::query(
        r#"
        SELECT id, make, model, year, mileage, created_at
        FROM vehicle_profiles
        ORDER BY seq ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut vehicles = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let created_at: String = row.get("created_at");

        vehicles.push(VehicleProfile {
            id: Uuid::parse_str(&id)
                .map_err(|e| Error::Internal(format!("Failed to parse vehicle id: {}", e)))?,
            make: row.get("make"),
            model: row.get("model"),
            year: row.get("year"),
            mileage: row.get("mileage"),
            created_at: parse_timestamp("created_at", &created_at)?,
        });
    }

    Ok(vehicles)
}
