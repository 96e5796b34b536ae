//! Monophonic pitch detection
//!
//! Estimates one fundamental frequency per short window using FFT peak-picking
//! ([`spectrum`]) and maps it to MIDI, Western and Thai notation.

pub mod peak_picking;
pub mod spectrum;

pub use spectrum::PitchEstimate;

use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use crate::notation::{
    frequency_to_midi, midi_to_note_name, midi_to_thai_notation, note_to_frequency, NO_PITCH,
};
use serde::{Deserialize, Serialize};

/// Pitch detected around a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchReading {
    /// Frequency in Hz (0.0 = undetected)
    pub frequency: f32,
    /// Confidence (0.0-1.0)
    pub confidence: f32,
    /// MIDI note number (0 = no pitch)
    pub midi_note: i32,
    /// Western note name, e.g. "A4"
    pub note_name: String,
    /// Thai solfège, e.g. "ล4"
    pub thai_notation: String,
}

impl PitchReading {
    /// The degenerate "no pitch" reading
    pub fn no_pitch() -> Self {
        Self {
            frequency: 0.0,
            confidence: 0.0,
            midi_note: 0,
            note_name: NO_PITCH.to_string(),
            thai_notation: NO_PITCH.to_string(),
        }
    }

    fn from_estimate(estimate: PitchEstimate) -> Self {
        let frequency = estimate.frequency();
        let midi_note = frequency_to_midi(frequency);
        Self {
            frequency,
            confidence: estimate.confidence(),
            midi_note,
            note_name: midi_to_note_name(midi_note),
            thai_notation: midi_to_thai_notation(midi_note),
        }
    }
}

/// FFT peak-picking pitch detector
#[derive(Debug, Clone)]
pub struct PitchDetector {
    sample_rate: u32,
    fmin: f32,
    fmax: f32,
    window: f32,
    peak_height_ratio: f32,
}

impl PitchDetector {
    /// Build a detector for audio at `sample_rate`
    ///
    /// The valid frequency range is taken from `config.fmin_note` and
    /// `config.fmax_note` (C2 to C7 by default).
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidConfig` for a zero sample rate, an
    /// unparseable or inverted note range, a non-positive window or an
    /// out-of-range peak height ratio.
    pub fn new(sample_rate: u32, config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        if sample_rate == 0 {
            return Err(TranscriptionError::InvalidConfig(
                "Sample rate must be > 0".to_string(),
            ));
        }
        config.validate_pitch()?;

        Ok(Self {
            sample_rate,
            fmin: note_to_frequency(&config.fmin_note)?,
            fmax: note_to_frequency(&config.fmax_note)?,
            window: config.pitch_window,
            peak_height_ratio: config.peak_height_ratio,
        })
    }

    /// Lowest frequency considered, in Hz
    pub fn fmin(&self) -> f32 {
        self.fmin
    }

    /// Highest frequency considered, in Hz
    pub fn fmax(&self) -> f32 {
        self.fmax
    }

    /// Estimate the pitch of a whole segment
    pub fn detect_pitch_fft(&self, segment: &[f32]) -> PitchEstimate {
        spectrum::detect_pitch_fft(
            segment,
            self.sample_rate,
            self.fmin,
            self.fmax,
            self.peak_height_ratio,
        )
    }

    /// Pitch in the configured window centred on `time` (seconds)
    pub fn detect_pitch_at_time(&self, samples: &[f32], time: f32) -> PitchReading {
        self.detect_pitch_at_time_with(samples, time, self.window)
    }

    /// Pitch in a window of `window` seconds centred on `time`
    ///
    /// The window is clamped to the buffer. An empty or inverted window yields
    /// [`PitchReading::no_pitch`].
    pub fn detect_pitch_at_time_with(&self, samples: &[f32], time: f32, window: f32) -> PitchReading {
        let sr = self.sample_rate as f64;
        let half = window as f64 / 2.0;
        let start = ((time as f64 - half) * sr) as i64;
        let end = ((time as f64 + half) * sr) as i64;

        let start = start.max(0);
        let end = end.min(samples.len() as i64);
        if end <= start {
            return PitchReading::no_pitch();
        }

        let segment = &samples[start as usize..end as usize];
        let reading = PitchReading::from_estimate(self.detect_pitch_fft(segment));

        log::debug!(
            "Pitch at {:.3}s: {:.1} Hz ({}), confidence {:.2}",
            time,
            reading.frequency,
            reading.note_name,
            reading.confidence
        );

        reading
    }
}
