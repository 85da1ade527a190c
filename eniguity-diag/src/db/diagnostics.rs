//! Diagnostic result persistence
//!
//! Rows carry the store's internal `seq` key; it is dropped when a row is
//! converted into the public [`DiagnosticResult`].

use chrono::Utc;
use eniguity_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp};
use crate::models::{DiagnosticResult, NewDiagnostic};

/// History page size
pub const HISTORY_LIMIT: i64 = 20;

/// Stored row, including the internal insertion key
#[derive(Debug, Clone)]
pub(crate) struct DiagnosticRow {
    pub seq: i64,
    pub result: DiagnosticResult,
}

impl TryFrom<SqliteRow> for DiagnosticRow {
    type Error = Error;

    fn try_from(row: SqliteRow) -> Result<Self> {
        let id: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id)
            .map_err(|e| Error::Internal(format!("Failed to parse id: {}", e)))?;

        let component: String = row.try_get("component")?;
        let severity: String = row.try_get("severity")?;
        let urgency: String = row.try_get("urgency_level")?;

        let recommendations: String = row.try_get("recommendations")?;
        let recommendations: Vec<String> = serde_json::from_str(&recommendations)
            .map_err(|e| Error::Internal(format!("Failed to deserialize recommendations: {}", e)))?;

        let created_at: String = row.try_get("created_at")?;

        Ok(Self {
            seq: row.try_get("seq")?,
            result: DiagnosticResult {
                id,
                vehicle_id: row.try_get("vehicle_id")?,
                audio_filename: row.try_get("audio_filename")?,
                component: component.parse().map_err(|e| Error::Internal(format!("{}", e)))?,
                diagnosis: row.try_get("diagnosis")?,
                confidence_score: row.try_get("confidence_score")?,
                severity: severity.parse().map_err(|e| Error::Internal(format!("{}", e)))?,
                recommendations,
                estimated_cost: row.try_get("estimated_cost")?,
                urgency_level: urgency.parse().map_err(|e| Error::Internal(format!("{}", e)))?,
                created_at: parse_timestamp("created_at", &created_at)?,
            },
        })
    }
}

impl From<DiagnosticRow> for DiagnosticResult {
    fn from(row: DiagnosticRow) -> Self {
        row.result
    }
}

/// Persist a new diagnostic and return the stored record
///
/// `created_at` is stamped here when the draft carries none.
pub async fn save_result(pool: &SqlitePool, new: NewDiagnostic) -> Result<DiagnosticResult> {
    let result = DiagnosticResult::from_new(new, Utc::now());

    let recommendations = serde_json::to_string(&result.recommendations)
        .map_err(|e| Error::Internal(format!("Failed to serialize recommendations: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO diagnostic_results (
            id, vehicle_id, audio_filename, component, diagnosis,
            confidence_score, severity, recommendations, estimated_cost,
            urgency_level, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(result.id.to_string())
    .bind(&result.vehicle_id)
    .bind(&result.audio_filename)
    .bind(result.component.as_str())
    .bind(&result.diagnosis)
    .bind(result.confidence_score)
    .bind(result.severity.as_str())
    .bind(&recommendations)
    .bind(result.estimated_cost)
    .bind(result.urgency_level.as_str())
    .bind(format_timestamp(&result.created_at))
    .execute(pool)
    .await?;

    tracing::debug!(
        id = %result.id,
        file = %result.audio_filename,
        component = %result.component,
        "Diagnostic result saved"
    );

    Ok(result)
}

/// Most recent results, newest first
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<DiagnosticResult>> {
    let rows = sqlx::query(
        r#"
        SELECT seq, id, vehicle_id, audio_filename, component, diagnosis,
               confidence_score, severity, recommendations, estimated_cost,
               urgency_level, created_at
        FROM diagnostic_results
        ORDER BY created_at DESC, seq DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|row| DiagnosticRow::try_from(row).map(DiagnosticResult::from))
        .collect()
}

/// Total number of stored results
pub async fn count_all(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM diagnostic_results")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
