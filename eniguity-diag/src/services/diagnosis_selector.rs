//! Rule-based diagnosis selection
//!
//! A fixed, ordered table of diagnosis templates and the rule that picks one
//! from a clip's features:
//!
//! 1. spectral centroid above [`BRAKE_SQUEAL_CENTROID_HZ`] → the first
//!    `Brakes` template (high-pitched squeal)
//! 2. zero-crossing rate above [`ENGINE_NOISE_ZCR`] → a random `Engine`
//!    template
//! 3. otherwise, or when features are unavailable → any template at random
//!
//! Only the centroid and zero-crossing rate take part in the rule; the
//! MFCCs and rolloff are extracted but unused.
//!
//! All randomness comes from the caller's [`Rng`], so tests can drive the
//! selector with a fixed generator.

use rand::Rng;

use crate::models::{Component, Diagnosis, FeatureVector, Severity, Urgency};

/// Centroid (Hz) above which a clip is treated as brake squeal
pub const BRAKE_SQUEAL_CENTROID_HZ: f64 = 2000.0;

/// Zero-crossing rate above which a clip is treated as engine noise
pub const ENGINE_NOISE_ZCR: f64 = 0.1;

/// Closed numeric range for a randomized field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Degenerate range that always yields `value`
    pub const fn fixed(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Uniform draw; a degenerate range returns its single value
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.high > self.low {
            rng.gen_range(self.low..self.high)
        } else {
            self.low
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Static diagnosis entry
#[derive(Debug, Clone, Copy)]
pub struct DiagnosisTemplate {
    pub component: Component,
    pub diagnosis: &'static str,
    pub confidence_range: ValueRange,
    pub severity: Severity,
    pub recommendations: &'static [&'static str],
    /// `None` leaves `estimated_cost` absent
    pub cost_range: Option<ValueRange>,
    pub urgency: Urgency,
}

impl DiagnosisTemplate {
    /// Copy the fixed fields and draw confidence and cost
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Diagnosis {
        let confidence_score = self.confidence_range.sample(rng);
        let estimated_cost = self.cost_range.map(|range| range.sample(rng));

        Diagnosis {
            component: self.component,
            diagnosis: self.diagnosis.to_string(),
            confidence_score,
            severity: self.severity,
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            estimated_cost,
            urgency: self.urgency,
        }
    }
}

/// Diagnosis table, in selection order
pub static DIAGNOSIS_TABLE: &[DiagnosisTemplate] = &[
    DiagnosisTemplate {
        component: Component::Engine,
        diagnosis: "Timing Belt Wear Detected",
        confidence_range: ValueRange::new(0.75, 0.95),
        severity: Severity::High,
        recommendations: &[
            "Schedule timing belt replacement within 2 weeks",
            "Check water pump condition during replacement",
            "Inspect tensioner and idler pulleys",
        ],
        cost_range: Some(ValueRange::new(800.0, 1200.0)),
        urgency: Urgency::Week,
    },
    DiagnosisTemplate {
        component: Component::Engine,
        diagnosis: "Healthy Engine Operation",
        confidence_range: ValueRange::new(0.85, 0.98),
        severity: Severity::Low,
        recommendations: &[
            "Continue regular maintenance schedule",
            "Monitor oil levels monthly",
            "Next service in 3 months",
        ],
        cost_range: Some(ValueRange::fixed(0.0)),
        urgency: Urgency::Monitoring,
    },
    DiagnosisTemplate {
        component: Component::Brakes,
        diagnosis: "Brake Pad Wear - Front Axle",
        confidence_range: ValueRange::new(0.80, 0.94),
        severity: Severity::Medium,
        recommendations: &[
            "Replace brake pads within 1 month",
            "Inspect brake rotors for scoring",
            "Check brake fluid level",
        ],
        cost_range: Some(ValueRange::new(300.0, 500.0)),
        urgency: Urgency::Month,
    },
    DiagnosisTemplate {
        component: Component::Engine,
        diagnosis: "Bearing Wear - Connecting Rod",
        confidence_range: ValueRange::new(0.70, 0.88),
        severity: Severity::Critical,
        recommendations: &[
            "IMMEDIATE ENGINE SHUTDOWN RECOMMENDED",
            "Tow to certified mechanic",
            "Complete engine inspection required",
        ],
        cost_range: Some(ValueRange::new(2000.0, 4000.0)),
        urgency: Urgency::Immediate,
    },
    DiagnosisTemplate {
        component: Component::Exhaust,
        diagnosis: "Exhaust Leak - Mid-Pipe Section",
        confidence_range: ValueRange::new(0.65, 0.82),
        severity: Severity::Medium,
        recommendations: &[
            "Repair exhaust leak within 2 weeks",
            "Check emissions compliance",
            "Inspect catalytic converter",
        ],
        cost_range: Some(ValueRange::new(200.0, 400.0)),
        urgency: Urgency::Week,
    },
];

/// Pick a template index for the given features
///
/// Pure apart from `rng`: the brake rule is deterministic, the other two
/// branches draw one uniform index.
///
/// # Panics
/// Panics if `table` is empty, or if a rule fires and the table has no entry
/// for its component. [`DIAGNOSIS_TABLE`] satisfies both.
pub fn select_index<R: Rng + ?Sized>(
    table: &[DiagnosisTemplate],
    features: Option<&FeatureVector>,
    rng: &mut R,
) -> usize {
    if let Some(features) = features {
        if features.spectral_centroid > BRAKE_SQUEAL_CENTROID_HZ {
            if let Some(idx) = table.iter().position(|t| t.component == Component::Brakes) {
                return idx;
            }
        } else if features.zero_crossing_rate > ENGINE_NOISE_ZCR {
            let engine: Vec<usize> = table
                .iter()
                .enumerate()
                .filter(|(_, t)| t.component == Component::Engine)
                .map(|(idx, _)| idx)
                .collect();
            if !engine.is_empty() {
                return engine[rng.gen_range(0..engine.len())];
            }
        }
    }

    rng.gen_range(0..table.len())
}

/// Select and resolve a diagnosis from [`DIAGNOSIS_TABLE`]
pub fn select_diagnosis<R: Rng + ?Sized>(features: Option<&FeatureVector>, rng: &mut R) -> Diagnosis {
    let idx = select_index(DIAGNOSIS_TABLE, features, rng);
    let template = &DIAGNOSIS_TABLE[idx];

    tracing::debug!(
        template = idx,
        component = %template.component,
        features_available = features.is_some(),
        "Diagnosis template selected"
    );

    template.resolve(rng)
}
