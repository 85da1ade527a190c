//! Health overview generator
//!
//! Scores are placeholders drawn at random per request; alerts are derived
//! from them. Recent diagnostics and the total count come from the store.

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use std::ops::RangeInclusive;

use crate::db;
use crate::models::{AlertKind, HealthAlert, HealthOverview, HealthScores, Severity};

pub const OVERALL_RANGE: RangeInclusive<u8> = 65..=95;
pub const ENGINE_RANGE: RangeInclusive<u8> = 70..=98;
pub const BRAKE_RANGE: RangeInclusive<u8> = 60..=90;
pub const TRANSMISSION_RANGE: RangeInclusive<u8> = 75..=95;
pub const EXHAUST_RANGE: RangeInclusive<u8> = 65..=88;

/// Brake score below which the dashboard warns
pub const BRAKE_ALERT_BELOW: u8 = 70;

/// Engine score below which the dashboard reports an error
pub const ENGINE_ALERT_BELOW: u8 = 75;

/// Number of diagnostics shown on the overview
pub const RECENT_LIMIT: i64 = 5;

/// Draw one independent score per subsystem
pub fn generate_health_scores<R: Rng + ?Sized>(rng: &mut R) -> HealthScores {
    HealthScores {
        overall_score: rng.gen_range(OVERALL_RANGE),
        engine_health: rng.gen_range(ENGINE_RANGE),
        brake_health: rng.gen_range(BRAKE_RANGE),
        transmission_health: rng.gen_range(TRANSMISSION_RANGE),
        exhaust_health: rng.gen_range(EXHAUST_RANGE),
        last_updated: Utc::now(),
    }
}

/// Alerts implied by a set of scores, brake alert first
pub fn derive_alerts(scores: &HealthScores) -> Vec<HealthAlert> {
    let mut alerts = Vec::new();

    if scores.brake_health < BRAKE_ALERT_BELOW {
        alerts.push(HealthAlert {
            kind: AlertKind::Warning,
            message: "Brake system requires attention".to_string(),
            severity: Severity::Medium,
        });
    }

    if scores.engine_health < ENGINE_ALERT_BELOW {
        alerts.push(HealthAlert {
            kind: AlertKind::Error,
            message: "Engine diagnostics show concerns".to_string(),
            severity: Severity::High,
        });
    }

    alerts
}

/// Assemble the dashboard payload
pub async fn build_overview(pool: &SqlitePool, scores: HealthScores) -> eniguity_common::Result<HealthOverview> {
    let alerts = derive_alerts(&scores);
    let recent_diagnostics = db::diagnostics::list_recent(pool, RECENT_LIMIT).await?;
    let total_diagnostics = db::diagnostics::count_all(pool).await?;

    Ok(HealthOverview {
        health_scores: scores,
        recent_diagnostics,
        alerts,
        total_diagnostics,
    })
}
