//! Health overview dashboard data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DiagnosticResult, Severity};

/// Per-subsystem health scores (0-100 scale)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScores {
    pub overall_score: u8,
    pub engine_health: u8,
    pub brake_health: u8,
    pub transmission_health: u8,
    pub exhaust_health: u8,
    pub last_updated: DateTime<Utc>,
}

/// Alert category shown by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Error,
}

/// Dashboard alert derived from health scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAlert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub message: String,
    pub severity: Severity,
}

/// GET /health-overview response
#[derive(Debug, Clone, Serialize)]
pub struct HealthOverview {
    pub health_scores: HealthScores,
    pub recent_diagnostics: Vec<DiagnosticResult>,
    pub alerts: Vec<HealthAlert>,
    pub total_diagnostics: i64,
}
