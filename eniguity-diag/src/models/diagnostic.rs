//! Diagnostic result data structures
//!
//! The wire names (`diagnosis`, `urgency_level`) match what existing clients
//! of the API already read.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Vehicle subsystem a diagnosis refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Engine,
    Brakes,
    Transmission,
    Exhaust,
}

impl Component {
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Engine => "Engine",
            Component::Brakes => "Brakes",
            Component::Transmission => "Transmission",
            Component::Exhaust => "Exhaust",
        }
    }
}

/// Severity of a diagnosis or alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// How soon the owner should act on a diagnosis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Immediate,
    Week,
    Month,
    Monitoring,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Immediate => "immediate",
            Urgency::Week => "week",
            Urgency::Month => "month",
            Urgency::Monitoring => "monitoring",
        }
    }
}

/// Error parsing a stored enum value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! impl_str_enum {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                [$($variant),+]
                    .into_iter()
                    .find(|v: &$ty| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_str_enum!(
    Component,
    "component",
    [Component::Engine, Component::Brakes, Component::Transmission, Component::Exhaust]
);
impl_str_enum!(
    Severity,
    "severity",
    [Severity::Low, Severity::Medium, Severity::High, Severity::Critical]
);
impl_str_enum!(
    Urgency,
    "urgency",
    [Urgency::Immediate, Urgency::Week, Urgency::Month, Urgency::Monitoring]
);

/// A diagnosis with its random ranges already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub component: Component,
    pub diagnosis: String,
    /// Confidence in [0.0, 1.0]
    pub confidence_score: f64,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub estimated_cost: Option<f64>,
    pub urgency: Urgency,
}

/// Diagnostic record before persistence
///
/// `created_at` is left empty by callers that want the store to stamp the
/// moment of persistence.
#[derive(Debug, Clone)]
pub struct NewDiagnostic {
    pub vehicle_id: Option<String>,
    pub audio_filename: String,
    pub diagnosis: Diagnosis,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewDiagnostic {
    pub fn new(audio_filename: impl Into<String>, diagnosis: Diagnosis) -> Self {
        Self {
            vehicle_id: None,
            audio_filename: audio_filename.into(),
            diagnosis,
            created_at: None,
        }
    }
}

/// Persisted diagnostic result (public API shape)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticResult {
    pub id: Uuid,
    /// Never validated against stored vehicle profiles
    pub vehicle_id: Option<String>,
    /// As declared by the client
    pub audio_filename: String,
    pub component: Component,
    pub diagnosis: String,
    pub confidence_score: f64,
    pub severity: Severity,
    pub recommendations: Vec<String>,
    pub estimated_cost: Option<f64>,
    pub urgency_level: Urgency,
    pub created_at: DateTime<Utc>,
}

impl DiagnosticResult {
    /// Assign identity and timestamp to a draft
    ///
    /// The timestamp is cut to microseconds, the precision the store keeps.
    pub fn from_new(new: NewDiagnostic, now: DateTime<Utc>) -> Self {
        let Diagnosis {
            component,
            diagnosis,
            confidence_score,
            severity,
            recommendations,
            estimated_cost,
            urgency,
        } = new.diagnosis;

        Self {
            id: Uuid::new_v4(),
            vehicle_id: new.vehicle_id,
            audio_filename: new.audio_filename,
            component,
            diagnosis,
            confidence_score,
            severity,
            recommendations,
            estimated_cost,
            urgency_level: urgency,
            created_at: new.created_at.unwrap_or(now).trunc_subsecs(6),
        }
    }
}
