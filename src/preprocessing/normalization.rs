//! Peak normalization
//!
//! The transcription engine assumes its input already peaks at 1.0; this is
//! the collaborator step that makes it so.
//!
//! # Example
//!
//! ```
//! use phin_transcriber::preprocessing::normalization::peak_normalize;
//!
//! let mut samples = vec![0.25f32, -0.5, 0.1];
//! let metadata = peak_normalize(&mut samples);
//! assert_eq!(samples, vec![0.5, -1.0, 0.2]);
//! assert!((metadata.gain_db - 6.0206).abs() < 1e-3);
//! ```

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Levels measured during normalization
#[derive(Debug, Clone)]
pub struct LoudnessMetadata {
    /// Peak level in dB (before normalization)
    pub peak_db: f32,
    /// RMS level in dB (before normalization)
    pub rms_db: f32,
    /// Gain applied in dB
    pub gain_db: f32,
}

impl Default for LoudnessMetadata {
    fn default() -> Self {
        Self {
            peak_db: f32::NEG_INFINITY,
            rms_db: f32::NEG_INFINITY,
            gain_db: 0.0,
        }
    }
}

fn to_db(linear: f32) -> f32 {
    if linear <= EPSILON {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Scale `samples` in place so the absolute peak is 1.0
///
/// Silent (or empty) input is left untouched with zero gain.
pub fn peak_normalize(samples: &mut [f32]) -> LoudnessMetadata {
    if samples.is_empty() {
        return LoudnessMetadata::default();
    }

    let peak = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    let rms = (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt();

    let mut metadata = LoudnessMetadata {
        peak_db: to_db(peak),
        rms_db: to_db(rms),
        gain_db: 0.0,
    };

    if peak <= EPSILON {
        log::debug!("Peak normalization skipped: silent input");
        return metadata;
    }

    let gain = 1.0 / peak;
    for s in samples.iter_mut() {
        *s *= gain;
    }
    metadata.gain_db = to_db(gain);

    log::debug!(
        "Peak normalized: peak {:.2} dB, gain {:.2} dB",
        metadata.peak_db,
        metadata.gain_db
    );

    metadata
}
