//! Spectral feature extraction
//!
//! Turns a decoded mono signal into the fixed [`FeatureVector`] the
//! diagnosis selector consumes. Extraction is deterministic and never fails
//! a request: a degenerate signal yields "features unavailable" (`None`).

use std::path::Path;
use thiserror::Error;

use crate::models::{FeatureVector, MFCC_COEFFICIENTS};
use crate::utils::audio_decoder::{decode_audio_file, DecodedAudio};
use crate::utils::spectral;

/// Mel bands fed into the cepstral transform
pub const MEL_BANDS: usize = 128;

/// Energy fraction for spectral rolloff
pub const ROLLOFF_PERCENT: f64 = 0.85;

/// Reasons features could not be computed
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("signal contains no samples")]
    EmptySignal,

    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Compute the feature vector for a mono signal
pub fn compute_features(samples: &[f32], sample_rate: u32) -> Result<FeatureVector, FeatureError> {
    if samples.is_empty() {
        return Err(FeatureError::EmptySignal);
    }
    if sample_rate == 0 {
        return Err(FeatureError::InvalidSampleRate(sample_rate));
    }

    let summary = spectral::summarize(
        samples,
        sample_rate,
        MEL_BANDS,
        MFCC_COEFFICIENTS,
        ROLLOFF_PERCENT,
    );

    let mut mfcc_means = [0.0; MFCC_COEFFICIENTS];
    for (slot, &value) in mfcc_means.iter_mut().zip(&summary.mfcc) {
        *slot = finite(value, "mfcc")?;
    }

    Ok(FeatureVector {
        mfcc_means,
        spectral_centroid: finite(summary.centroid, "spectral centroid")?,
        spectral_rolloff: finite(summary.rolloff, "spectral rolloff")?,
        zero_crossing_rate: finite(summary.zero_crossing_rate, "zero crossing rate")?,
        duration_seconds: samples.len() as f64 / sample_rate as f64,
    })
}

fn finite(value: f64, what: &'static str) -> Result<f64, FeatureError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FeatureError::NonFinite(what))
    }
}

/// Extract features from decoded audio, logging instead of failing
pub fn extract_features(audio: &DecodedAudio) -> Option<FeatureVector> {
    match compute_features(&audio.samples, audio.sample_rate) {
        Ok(features) => {
            tracing::debug!(
                spectral_centroid = features.spectral_centroid,
                spectral_rolloff = features.spectral_rolloff,
                zero_crossing_rate = features.zero_crossing_rate,
                duration_seconds = features.duration_seconds,
                "Extracted audio features"
            );
            Some(features)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Feature extraction failed, continuing without features");
            None
        }
    }
}

/// Decode a staged file and extract its features
///
/// Decode failures are errors (the upload is not valid audio); feature
/// failures are not.
pub fn analyze_file(path: &Path) -> anyhow::Result<Option<FeatureVector>> {
    let audio = decode_audio_file(path)?;
    Ok(extract_features(&audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq: f64, sample_rate: u32, seconds: f64) -> Vec<f32> {
        let n = (sample_rate as f64 * seconds) as usize;
        (0..n)
            .map(|i| (0.5 * (2.0 * PI * freq * i as f64 / sample_rate as f64).sin()) as f32)
            .collect()
    }

    #[test]
    fn test_empty_signal_is_rejected() {
        assert_eq!(compute_features(&[], 44100), Err(FeatureError::EmptySignal));
    }

    #[test]
    fn test_zero_sample_rate_is_rejected() {
        assert_eq!(
            compute_features(&[0.1, 0.2], 0),
            Err(FeatureError::InvalidSampleRate(0))
        );
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let samples = tone(440.0, 22050, 0.5);
        let a = compute_features(&samples, 22050).unwrap();
        let b = compute_features(&samples, 22050).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_duration_uses_native_sample_rate() {
        let samples = tone(440.0, 8000, 1.5);
        let features = compute_features(&samples, 8000).unwrap();
        assert!((features.duration_seconds - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_high_tone_is_bright_low_tone_is_dark() {
        let high = compute_features(&tone(5000.0, 22050, 1.0), 22050).unwrap();
        let low = compute_features(&tone(200.0, 22050, 1.0), 22050).unwrap();

        assert!(high.spectral_centroid > 2000.0, "{}", high.spectral_centroid);
        assert!(low.spectral_centroid < 2000.0, "{}", low.spectral_centroid);
        assert!(high.spectral_rolloff > low.spectral_rolloff);
        assert!(high.zero_crossing_rate > low.zero_crossing_rate);
    }

    #[test]
    fn test_silence_yields_finite_features() {
        let features = compute_features(&vec![0.0; 4096], 16000).unwrap();
        assert_eq!(features.spectral_centroid, 0.0);
        assert_eq!(features.zero_crossing_rate, 0.0);
        assert!(features.mfcc_means.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_non_finite_samples_are_reported() {
        let mut samples = tone(440.0, 16000, 0.25);
        samples[100] = f32::NAN;
        assert!(matches!(
            compute_features(&samples, 16000),
            Err(FeatureError::NonFinite(_))
        ));
    }

    #[test]
    fn test_long_clip_is_summarized() {
        // Five minutes at a low rate, the shape of a long compressed upload
        let samples = tone(3000.0, 8000, 300.0);
        let features = compute_features(&samples, 8000).unwrap();
        assert!((features.duration_seconds - 300.0).abs() < 1e-9);
        assert!(features.spectral_centroid > 2000.0, "{}", features.spectral_centroid);
        assert!(features.mfcc_means.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_extract_features_swallows_failure() {
        let audio = DecodedAudio {
            samples: Vec::new(),
            sample_rate: 44100,
            channels: 1,
            duration_seconds: 0.0,
        };
        assert!(extract_features(&audio).is_none());
    }
}
