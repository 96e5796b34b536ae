//! Audio quality validation
//!
//! A quick gate run before transcription: audio that is too short or too quiet
//! is flagged so callers can skip it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum duration in seconds for usable audio
pub const MIN_DURATION_SECONDS: f32 = 0.5;

/// Minimum absolute peak for usable audio
pub const MIN_PEAK_AMPLITUDE: f32 = 0.01;

/// Reason audio failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityIssue {
    /// Shorter than [`MIN_DURATION_SECONDS`]
    TooShort,
    /// Peak below [`MIN_PEAK_AMPLITUDE`]
    TooQuiet,
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityIssue::TooShort => write!(f, "Audio too short"),
            QualityIssue::TooQuiet => write!(f, "Audio too quiet"),
        }
    }
}

/// Basic signal measurements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioQuality {
    /// Duration in seconds
    pub duration_seconds: f32,
    /// Absolute peak amplitude
    pub max_amplitude: f32,
    /// RMS amplitude over the whole buffer
    pub rms_energy: f32,
    /// Fraction of samples at which the sign changes
    pub zero_crossing_rate: f32,
    /// First problem found, if any
    pub issue: Option<QualityIssue>,
}

impl AudioQuality {
    /// True when no issue was found
    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }
}

/// Measure `samples` and flag audio that is too short or too quiet
///
/// Duration is checked before loudness.
pub fn validate_audio_quality(samples: &[f32], sample_rate: u32) -> AudioQuality {
    let duration_seconds = if sample_rate == 0 {
        0.0
    } else {
        samples.len() as f32 / sample_rate as f32
    };

    let max_amplitude = samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));

    let (rms_energy, zero_crossing_rate) = if samples.is_empty() {
        (0.0, 0.0)
    } else {
        let rms = (samples.iter().map(|&x| x * x).sum::<f32>() / samples.len() as f32).sqrt();
        let crossings = samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        (rms, crossings as f32 / samples.len() as f32)
    };

    let issue = if duration_seconds < MIN_DURATION_SECONDS {
        Some(QualityIssue::TooShort)
    } else if max_amplitude < MIN_PEAK_AMPLITUDE {
        Some(QualityIssue::TooQuiet)
    } else {
        None
    };

    if let Some(issue) = issue {
        log::debug!("Audio failed quality check: {}", issue);
    }

    AudioQuality {
        duration_seconds,
        max_amplitude,
        rms_energy,
        zero_crossing_rate,
        issue,
    }
}
