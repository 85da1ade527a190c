//! Database access for eniguity-diag
//!
//! Append-only SQLite store for diagnostic results and vehicle profiles.

pub mod diagnostics;
pub mod vehicles;

use chrono::{DateTime, SecondsFormat, Utc};
use eniguity_common::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// sqlx connection string for a database file, created on first connect
pub fn database_url_for(db_path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", db_path.display())
}

/// Initialize database connection pool
///
/// Creates the parent directory of a file-backed database and the tables.
pub async fn init_database_pool(db_url: &str) -> Result<SqlitePool> {
    if let Some(path) = file_path_of(db_url) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory pool
///
/// Every connection to `sqlite::memory:` opens a separate database, so the
/// pool is capped at one connection that is never recycled.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    init_tables(&pool).await?;
    Ok(pool)
}

fn file_path_of(db_url: &str) -> Option<&Path> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next()?;
    if path.is_empty() || path.starts_with(":memory:") || path == "memory:" {
        return None;
    }
    Some(Path::new(path))
}

/// Create tables if they don't exist
async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS diagnostic_results (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            vehicle_id TEXT,
            audio_filename TEXT NOT NULL,
            component TEXT NOT NULL,
            diagnosis TEXT NOT NULL,
            confidence_score REAL NOT NULL,
            severity TEXT NOT NULL,
            recommendations TEXT NOT NULL DEFAULT '[]',
            estimated_cost REAL,
            urgency_level TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_diagnostic_results_created
        ON diagnostic_results (created_at DESC, seq DESC)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicle_profiles (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            make TEXT NOT NULL,
            model TEXT NOT NULL,
            year INTEGER NOT NULL,
            mileage INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (diagnostic_results, vehicle_profiles)");

    Ok(())
}

/// Fixed-width UTC timestamp; text order matches time order
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Failed to parse {}: {}", field, e)))
}
