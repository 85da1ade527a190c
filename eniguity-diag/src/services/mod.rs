//! Business logic services

pub mod diagnosis_selector;
pub mod feature_extractor;
pub mod health_overview;
pub mod ingest;

pub use diagnosis_selector::{select_diagnosis, DIAGNOSIS_TABLE};
pub use feature_extractor::{analyze_file, extract_features};
pub use health_overview::{build_overview, derive_alerts, generate_health_scores};
pub use ingest::{AudioFormat, IngestError, StagedUpload, UploadStager};
