//! Data models for eniguity-diag

pub mod diagnostic;
pub mod features;
pub mod health;
pub mod vehicle;

pub use diagnostic::{
    Component, Diagnosis, DiagnosticResult, NewDiagnostic, Severity, UnknownVariant, Urgency,
};
pub use features::{FeatureVector, MFCC_COEFFICIENTS};
pub use health::{AlertKind, HealthAlert, HealthOverview, HealthScores};
pub use vehicle::{CreateVehicleRequest, VehicleProfile};
