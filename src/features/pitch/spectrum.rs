//! FFT spectral peak-picking pitch estimation
//!
//! # Algorithm
//!
//! 1. Magnitude spectrum of the whole segment (no window), bins `0..n/2`,
//!    bin `k` at `k * sample_rate / n` Hz
//! 2. Keep bins inside `[fmin, fmax]`
//! 3. Peak-pick the restricted curve, keeping peaks ≥ `peak_height_ratio * max`
//! 4. Tallest peak wins; without any peak, fall back to the in-range argmax
//!
//! Confidence is the chosen magnitude divided by the in-range maximum.

use super::peak_picking::{find_peaks, tallest_peak};
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Outcome of spectral pitch picking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PitchEstimate {
    /// Tallest qualifying spectral peak
    Peak {
        /// Bin frequency in Hz
        frequency: f32,
        /// Peak height relative to the in-range maximum
        confidence: f32,
    },
    /// No qualifying peak; global in-range maximum used instead
    GlobalMax {
        /// Bin frequency in Hz
        frequency: f32,
        /// Always relative to the in-range maximum
        confidence: f32,
    },
    /// No bins in range, or no energy in range
    NoPitch,
}

impl PitchEstimate {
    /// Estimated frequency in Hz (0.0 for `NoPitch`)
    pub fn frequency(&self) -> f32 {
        match self {
            PitchEstimate::Peak { frequency, .. } | PitchEstimate::GlobalMax { frequency, .. } => {
                *frequency
            }
            PitchEstimate::NoPitch => 0.0,
        }
    }

    /// Confidence in [0, 1] (0.0 for `NoPitch`)
    pub fn confidence(&self) -> f32 {
        match self {
            PitchEstimate::Peak { confidence, .. }
            | PitchEstimate::GlobalMax { confidence, .. } => *confidence,
            PitchEstimate::NoPitch => 0.0,
        }
    }
}

/// Magnitude spectrum `|X[k]|` for `k` in `0..n/2`
pub fn magnitude_spectrum(segment: &[f32]) -> Vec<f32> {
    let n = segment.len();
    if n < 2 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> = segment.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    buffer[..n / 2].iter().map(|c| c.norm()).collect()
}

/// Estimate the dominant frequency of `segment` within `[fmin, fmax]`
///
/// # Example
///
/// ```
/// use phin_transcriber::features::pitch::spectrum::{detect_pitch_fft, PitchEstimate};
///
/// let sr = 22050;
/// let segment: Vec<f32> = (0..2205)
///     .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin())
///     .collect();
/// let estimate = detect_pitch_fft(&segment, sr, 65.4, 2093.0, 0.3);
/// assert!(matches!(estimate, PitchEstimate::Peak { .. }));
/// assert!((estimate.frequency() - 440.0).abs() <= 10.0);
/// ```
pub fn detect_pitch_fft(
    segment: &[f32],
    sample_rate: u32,
    fmin: f32,
    fmax: f32,
    peak_height_ratio: f32,
) -> PitchEstimate {
    let magnitude = magnitude_spectrum(segment);
    let n = segment.len() as f32;
    let bin_hz = sample_rate as f32 / n;

    let (freqs, mags): (Vec<f32>, Vec<f32>) = magnitude
        .iter()
        .enumerate()
        .map(|(k, &m)| (k as f32 * bin_hz, m))
        .filter(|&(f, _)| f >= fmin && f <= fmax)
        .unzip();

    select_pitch(&freqs, &mags, peak_height_ratio)
}

/// Pick the pitch from an in-range magnitude curve and its bin frequencies
///
/// This is the peak-versus-fallback branch on its own, returning the tagged
/// result.
pub fn select_pitch(freqs: &[f32], mags: &[f32], peak_height_ratio: f32) -> PitchEstimate {
    if mags.is_empty() {
        return PitchEstimate::NoPitch;
    }

    // First index of the maximum
    let (max_idx, max_mag) = mags
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |best, (i, m)| if m > best.1 { (i, m) } else { best });

    if max_mag <= EPSILON {
        log::debug!("No spectral energy in range, no pitch");
        return PitchEstimate::NoPitch;
    }

    let peaks = find_peaks(mags, max_mag * peak_height_ratio);
    match tallest_peak(&peaks) {
        Some((idx, height)) => PitchEstimate::Peak {
            frequency: freqs[idx],
            confidence: height / max_mag,
        },
        None => {
            log::debug!("No spectral peaks, falling back to global maximum");
            PitchEstimate::GlobalMax {
                frequency: freqs[max_idx],
                confidence: mags[max_idx] / max_mag,
            }
        }
    }
}
