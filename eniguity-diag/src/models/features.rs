//! Spectral feature vector extracted from one uploaded clip

use serde::Serialize;

/// Number of MFCC coefficients kept per clip
pub const MFCC_COEFFICIENTS: usize = 13;

/// Time-averaged spectral summary of a clip
///
/// Request-scoped: produced once by the feature extractor, consumed once by
/// the diagnosis selector, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub mfcc_means: [f64; MFCC_COEFFICIENTS],
    /// Hz
    pub spectral_centroid: f64,
    /// Hz
    pub spectral_rolloff: f64,
    /// Fraction of sign changes per sample, 0.0 - 1.0
    pub zero_crossing_rate: f64,
    pub duration_seconds: f64,
}
