//! Configuration parameters for transcription

use crate::error::TranscriptionError;
use crate::export::midi::{tempo_to_uspq, MAX_TEMPO_USPQ};
use crate::notation::note_to_frequency;

/// Sample rate the default frame and hop sizes are tuned for, in Hz
pub const REFERENCE_SAMPLE_RATE: u32 = 22050;

/// Transcription configuration parameters
///
/// All values are fixed once a [`Transcriber`](crate::Transcriber) (or one of the
/// detectors) has been built from them. The sample rate is supplied separately at
/// construction, alongside the audio it describes.
#[derive(Debug, Clone)]
pub struct TranscriptionConfig {
    // Energy envelope
    /// Frame size for RMS energy in samples (default: 2048)
    pub frame_size: usize,

    /// Hop size between frames in samples (default: 512, ~23 ms at 22050 Hz)
    pub hop_size: usize,

    // Onset detection
    /// Multiplier applied to the EWMA baseline to form the onset threshold (default: 1.5)
    pub threshold_ratio: f32,

    /// EWMA smoothing factor in (0, 1] (default: 0.3)
    /// Higher values follow the envelope faster, lower values give a steadier floor
    pub ewma_alpha: f32,

    /// Minimum time between two kept onsets in seconds (default: 0.05)
    pub min_onset_gap: f32,

    // Pitch detection
    /// Analysis window centred on each onset, in seconds (default: 0.05)
    pub pitch_window: f32,

    /// Minimum spectral peak height relative to the in-range maximum (default: 0.3)
    pub peak_height_ratio: f32,

    /// Lowest note considered by the pitch detector (default: "C2")
    pub fmin_note: String,

    /// Highest note considered by the pitch detector (default: "C7")
    pub fmax_note: String,

    // Transcription
    /// Notes below this pitch confidence are dropped (default: 0.3)
    pub min_note_confidence: f32,

    // MIDI export
    /// Tempo written to exported MIDI tracks (default: 120.0)
    pub tempo_bpm: f32,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            threshold_ratio: 1.5,
            ewma_alpha: 0.3,
            min_onset_gap: 0.05,
            pitch_window: 0.05,
            peak_height_ratio: 0.3,
            fmin_note: "C2".to_string(),
            fmax_note: "C7".to_string(),
            min_note_confidence: 0.3,
            tempo_bpm: 120.0,
        }
    }
}

impl TranscriptionConfig {
    /// Copy with `frame_size` and `hop_size` rescaled from
    /// [`REFERENCE_SAMPLE_RATE`] to `sample_rate`
    ///
    /// Keeps the analysis frames at the same duration in seconds (the default
    /// hop stays ~23 ms) for audio decoded at its native rate.
    ///
    /// ```
    /// use phin_transcriber::TranscriptionConfig;
    ///
    /// let config = TranscriptionConfig::default().scaled_to_sample_rate(44100);
    /// assert_eq!((config.frame_size, config.hop_size), (4096, 1024));
    /// ```
    pub fn scaled_to_sample_rate(&self, sample_rate: u32) -> Self {
        let scale = |n: usize| {
            let scaled = (n as f64 * sample_rate as f64 / REFERENCE_SAMPLE_RATE as f64).round();
            (scaled as usize).max(1)
        };
        Self {
            frame_size: scale(self.frame_size),
            hop_size: scale(self.hop_size),
            ..self.clone()
        }
    }

    /// Check every field, returning the first problem found
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidConfig` describing the offending field.
    pub fn validate(&self) -> Result<(), TranscriptionError> {
        self.validate_onset()?;
        self.validate_pitch()?;

        if !(0.0..=1.0).contains(&self.min_note_confidence) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "min_note_confidence must be in [0.0, 1.0], got {}",
                self.min_note_confidence
            )));
        }

        if tempo_to_uspq(self.tempo_bpm).is_none() {
            return Err(TranscriptionError::InvalidConfig(format!(
                "tempo_bpm must be > 0 and encodable as a MIDI tempo (at most {} us per quarter note), got {}",
                MAX_TEMPO_USPQ, self.tempo_bpm
            )));
        }

        Ok(())
    }

    pub(crate) fn validate_onset(&self) -> Result<(), TranscriptionError> {
        if self.frame_size == 0 {
            return Err(TranscriptionError::InvalidConfig(
                "frame_size must be > 0".to_string(),
            ));
        }

        if self.hop_size == 0 {
            return Err(TranscriptionError::InvalidConfig(
                "hop_size must be > 0".to_string(),
            ));
        }

        if !(self.threshold_ratio.is_finite() && self.threshold_ratio > 0.0) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "threshold_ratio must be > 0, got {}",
                self.threshold_ratio
            )));
        }

        if !(self.ewma_alpha > 0.0 && self.ewma_alpha <= 1.0) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "ewma_alpha must be in (0.0, 1.0], got {}",
                self.ewma_alpha
            )));
        }

        if !(self.min_onset_gap.is_finite() && self.min_onset_gap >= 0.0) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "min_onset_gap must be >= 0, got {}",
                self.min_onset_gap
            )));
        }

        Ok(())
    }

    pub(crate) fn validate_pitch(&self) -> Result<(), TranscriptionError> {
        if !(self.pitch_window.is_finite() && self.pitch_window > 0.0) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "pitch_window must be > 0, got {}",
                self.pitch_window
            )));
        }

        if !(self.peak_height_ratio > 0.0 && self.peak_height_ratio <= 1.0) {
            return Err(TranscriptionError::InvalidConfig(format!(
                "peak_height_ratio must be in (0.0, 1.0], got {}",
                self.peak_height_ratio
            )));
        }

        let fmin = note_to_frequency(&self.fmin_note)?;
        let fmax = note_to_frequency(&self.fmax_note)?;
        if fmin >= fmax {
            return Err(TranscriptionError::InvalidConfig(format!(
                "fmin_note ({}) must be below fmax_note ({})",
                self.fmin_note, self.fmax_note
            )));
        }

        Ok(())
    }
}
