//! Short-time spectral analysis primitives
//!
//! Frame layout follows the conventions most audio tooling uses by default:
//! 2048-sample frames, 512-sample hop, periodic Hann window, and frames
//! centered on their hop position (the signal is zero-padded by half a frame
//! on both sides).
//!
//! Analysis streams over frames. Only one frame of FFT state is alive at a
//! time, so memory does not grow with clip length.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f64::consts::PI;
use std::sync::Arc;

/// Samples per analysis frame (FFT size)
pub const FRAME_LENGTH: usize = 2048;

/// Samples between consecutive frame starts
pub const HOP_LENGTH: usize = 512;

/// Non-negative frequency bins per frame
pub const NUM_BINS: usize = FRAME_LENGTH / 2 + 1;

/// Magnitudes at or below this are treated as zero when counting sign changes
const ZERO_CROSSING_THRESHOLD: f32 = 1e-10;

/// Floor applied before taking a logarithm of power values
const POWER_FLOOR: f64 = 1e-10;

/// Dynamic range kept below the loudest mel cell of the clip
const TOP_DB: f64 = 80.0;

/// Periodic Hann window
fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / size as f64).cos())
        .collect()
}

/// Number of centered frames for a signal of `len` samples
///
/// Padding by half a frame on each side means one frame always fits.
pub fn centered_frame_count(len: usize, hop_length: usize) -> usize {
    1 + len / hop_length
}

/// Center frequency of an FFT bin in Hz
fn bin_frequency(bin: usize, sample_rate: u32) -> f64 {
    bin as f64 * sample_rate as f64 / FRAME_LENGTH as f64
}

/// Reusable STFT state for one frame at a time
pub struct FrameAnalyzer {
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    buffer: Vec<Complex<f64>>,
    magnitudes: Vec<f64>,
}

impl FrameAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::<f64>::new();
        Self {
            fft: planner.plan_fft_forward(FRAME_LENGTH),
            window: hann_window(FRAME_LENGTH),
            buffer: vec![Complex::new(0.0, 0.0); FRAME_LENGTH],
            magnitudes: vec![0.0; NUM_BINS],
        }
    }

    /// Magnitude spectrum of centered frame `frame_idx`
    ///
    /// Samples outside the signal read as zero. The returned slice is
    /// overwritten by the next call.
    pub fn magnitudes(&mut self, samples: &[f32], frame_idx: usize) -> &[f64] {
        let pad = FRAME_LENGTH / 2;
        let start = frame_idx * HOP_LENGTH;

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = (start + i)
                .checked_sub(pad)
                .and_then(|j| samples.get(j))
                .map_or(0.0, |&s| s as f64);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        for (mag, c) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = c.norm();
        }
        &self.magnitudes
    }
}

impl Default for FrameAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Magnitude-weighted mean frequency of one frame (Hz)
///
/// A silent frame has a centroid of 0.
pub fn frame_centroid(magnitudes: &[f64], sample_rate: u32) -> f64 {
    let total: f64 = magnitudes.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }
    let weighted: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(bin, &mag)| bin_frequency(bin, sample_rate) * mag)
        .sum();
    weighted / total
}

/// Frequency below which `roll_percent` of one frame's magnitude lies (Hz)
pub fn frame_rolloff(magnitudes: &[f64], sample_rate: u32, roll_percent: f64) -> f64 {
    let threshold = roll_percent * magnitudes.iter().sum::<f64>();
    let mut cumulative = 0.0;
    for (bin, &mag) in magnitudes.iter().enumerate() {
        cumulative += mag;
        if cumulative >= threshold {
            return bin_frequency(bin, sample_rate);
        }
    }
    bin_frequency(magnitudes.len().saturating_sub(1), sample_rate)
}

/// Fraction of sign changes in centered frame `frame_idx`
///
/// Values with magnitude below 1e-10 count as zero, and zero counts as
/// positive. Outside the signal the edge samples repeat, so the first and
/// last frames see the signal's own boundary values.
pub fn frame_zero_crossing_rate(samples: &[f32], frame_idx: usize) -> f64 {
    let (Some(&first), Some(&last)) = (samples.first(), samples.last()) else {
        return 0.0;
    };
    let pad = FRAME_LENGTH / 2;
    let start = frame_idx * HOP_LENGTH;
    let end = (start + FRAME_LENGTH).min(samples.len() + 2 * pad);

    let at = |p: usize| match p.checked_sub(pad) {
        None => first,
        Some(j) => samples.get(j).copied().unwrap_or(last),
    };
    let is_negative = |s: f32| s < -ZERO_CROSSING_THRESHOLD;

    let crossings = (start + 1..end)
        .filter(|&p| is_negative(at(p - 1)) != is_negative(at(p)))
        .count();
    crossings as f64 / FRAME_LENGTH as f64
}

/// Hz → mel on the Slaney scale (linear below 1 kHz, logarithmic above)
pub fn hz_to_mel(hz: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    let min_log_mel = MIN_LOG_HZ / F_SP;
    let logstep = 6.4_f64.ln() / 27.0;

    if hz >= MIN_LOG_HZ {
        min_log_mel + (hz / MIN_LOG_HZ).ln() / logstep
    } else {
        hz / F_SP
    }
}

/// Mel → Hz on the Slaney scale
pub fn mel_to_hz(mel: f64) -> f64 {
    const F_SP: f64 = 200.0 / 3.0;
    const MIN_LOG_HZ: f64 = 1000.0;
    let min_log_mel = MIN_LOG_HZ / F_SP;
    let logstep = 6.4_f64.ln() / 27.0;

    if mel >= min_log_mel {
        MIN_LOG_HZ * (logstep * (mel - min_log_mel)).exp()
    } else {
        F_SP * mel
    }
}

/// One triangular mel filter, stored over its non-zero bins only
#[derive(Debug, Clone, PartialEq)]
pub struct MelBand {
    pub start_bin: usize,
    pub weights: Vec<f64>,
}

impl MelBand {
    /// Weighted power of a magnitude frame under this filter
    pub fn energy(&self, magnitudes: &[f64]) -> f64 {
        magnitudes
            .iter()
            .skip(self.start_bin)
            .zip(&self.weights)
            .map(|(&mag, &w)| w * mag * mag)
            .sum()
    }
}

/// Triangular mel filterbank with Slaney area normalization
///
/// Bands cover 0 Hz to Nyquist.
pub fn mel_filterbank(n_mels: usize, sample_rate: u32) -> Vec<MelBand> {
    let nyquist = sample_rate as f64 / 2.0;
    let mel_max = hz_to_mel(nyquist);
    let mel_points: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    (0..n_mels)
        .map(|m| {
            let (lower, center, upper) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
            let enorm = 2.0 / (upper - lower);
            let weight = |bin: usize| {
                let f = bin_frequency(bin, sample_rate);
                let rising = (f - lower) / (center - lower);
                let falling = (upper - f) / (upper - center);
                rising.min(falling).max(0.0) * enorm
            };

            let Some(start_bin) = (0..NUM_BINS).find(|&bin| weight(bin) > 0.0) else {
                return MelBand {
                    start_bin: 0,
                    weights: Vec::new(),
                };
            };
            let end_bin = (start_bin..NUM_BINS)
                .rev()
                .find(|&bin| weight(bin) > 0.0)
                .unwrap_or(start_bin);

            MelBand {
                start_bin,
                weights: (start_bin..=end_bin).map(weight).collect(),
            }
        })
        .collect()
}

/// Mel filterbank plus orthonormal DCT-II basis
pub struct Cepstrum {
    filterbank: Vec<MelBand>,
    basis: Vec<Vec<f64>>,
}

impl Cepstrum {
    pub fn new(n_mels: usize, n_mfcc: usize, sample_rate: u32) -> Self {
        Self {
            filterbank: mel_filterbank(n_mels, sample_rate),
            basis: dct_basis(n_mfcc, n_mels),
        }
    }

    /// Log mel energies (dB) of one magnitude frame into `out`
    pub fn mel_db(&self, magnitudes: &[f64], out: &mut [f64]) {
        for (band, slot) in self.filterbank.iter().zip(out.iter_mut()) {
            *slot = 10.0 * band.energy(magnitudes).max(POWER_FLOOR).log10();
        }
    }

    /// Cepstral coefficients of one dB frame, values below `floor` clamped
    pub fn coefficients(&self, mel_db: &[f64], floor: f64, out: &mut [f64]) {
        for (row, slot) in self.basis.iter().zip(out.iter_mut()) {
            *slot = row.iter().zip(mel_db).map(|(&b, &e)| b * e.max(floor)).sum();
        }
    }
}

/// Orthonormal DCT-II basis, `[n_out][n_in]`
fn dct_basis(n_out: usize, n_in: usize) -> Vec<Vec<f64>> {
    let n = n_in as f64;
    (0..n_out)
        .map(|k| {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            (0..n_in)
                .map(|i| scale * (PI * k as f64 * (2.0 * i as f64 + 1.0) / (2.0 * n)).cos())
                .collect()
        })
        .collect()
}

/// Per-clip means of the frame-level features
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralSummary {
    pub frames: usize,
    /// Hz
    pub centroid: f64,
    /// Hz
    pub rolloff: f64,
    pub zero_crossing_rate: f64,
    pub mfcc: Vec<f64>,
}

/// Average centroid, rolloff, ZCR and MFCCs over every frame of a signal
///
/// Two passes over the frames: the first accumulates the scalar features
/// and finds the loudest mel cell, the second applies the 80 dB floor that
/// peak sets and accumulates the cepstral means. Working memory is one
/// frame regardless of signal length.
pub fn summarize(
    samples: &[f32],
    sample_rate: u32,
    n_mels: usize,
    n_mfcc: usize,
    roll_percent: f64,
) -> SpectralSummary {
    let frames = centered_frame_count(samples.len(), HOP_LENGTH);
    let mut analyzer = FrameAnalyzer::new();
    let cepstrum = Cepstrum::new(n_mels, n_mfcc, sample_rate);
    let mut mel_db = vec![0.0; n_mels];

    let mut centroid = 0.0;
    let mut rolloff = 0.0;
    let mut zero_crossing_rate = 0.0;
    let mut peak = f64::NEG_INFINITY;

    for frame_idx in 0..frames {
        let magnitudes = analyzer.magnitudes(samples, frame_idx);
        centroid += frame_centroid(magnitudes, sample_rate);
        rolloff += frame_rolloff(magnitudes, sample_rate, roll_percent);
        cepstrum.mel_db(magnitudes, &mut mel_db);
        peak = mel_db.iter().copied().fold(peak, f64::max);
        zero_crossing_rate += frame_zero_crossing_rate(samples, frame_idx);
    }

    let floor = peak - TOP_DB;
    let mut coefficients = vec![0.0; n_mfcc];
    let mut mfcc = vec![0.0; n_mfcc];

    for frame_idx in 0..frames {
        let magnitudes = analyzer.magnitudes(samples, frame_idx);
        cepstrum.mel_db(magnitudes, &mut mel_db);
        cepstrum.coefficients(&mel_db, floor, &mut coefficients);
        for (sum, c) in mfcc.iter_mut().zip(&coefficients) {
            *sum += c;
        }
    }

    let n = frames as f64;
    for sum in mfcc.iter_mut() {
        *sum /= n;
    }

    SpectralSummary {
        frames,
        centroid: centroid / n,
        rolloff: rolloff / n,
        zero_crossing_rate: zero_crossing_rate / n,
        mfcc,
    }
}
