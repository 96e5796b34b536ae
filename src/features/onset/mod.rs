//! Energy-based onset detection
//!
//! Finds note starts from the RMS energy envelope alone:
//! 1. RMS envelope per frame ([`energy`])
//! 2. EWMA baseline of the envelope ([`ewma`])
//! 3. Candidate frames: energy above `baseline * threshold_ratio` *and* rising
//! 4. Debounce: drop candidates closer than `min_duration` to the last kept one
//!
//! The rising-edge condition keeps a sustained plateau above the threshold from
//! re-triggering, and the debounce absorbs ripple from tremolo or vibrato.
//!
//! # Example
//!
//! ```
//! use phin_transcriber::features::onset::OnsetDetector;
//! use phin_transcriber::TranscriptionConfig;
//!
//! let detector = OnsetDetector::new(22050, &TranscriptionConfig::default())?;
//! let mut samples = vec![0.0f32; 22050];
//! for s in samples[11025..].iter_mut() {
//!     *s = 0.5;
//! }
//! // The RMS ramp of a 2048-sample frame spans four hops; a 0.1 s gap covers it
//! let onsets = detector.detect_onsets_with(&samples, 1.5, 0.1);
//! assert_eq!(onsets.len(), 1);
//! # Ok::<(), phin_transcriber::TranscriptionError>(())
//! ```

pub mod energy;
pub mod ewma;

use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;

/// Energy/EWMA onset detector
///
/// Holds only immutable configuration; every call works on local state.
#[derive(Debug, Clone)]
pub struct OnsetDetector {
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
    alpha: f32,
    threshold_ratio: f32,
    min_onset_gap: f32,
}

impl OnsetDetector {
    /// Build a detector for audio at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidConfig` if the sample rate is zero or
    /// any onset setting in `config` is out of range.
    pub fn new(sample_rate: u32, config: &TranscriptionConfig) -> Result<Self, TranscriptionError> {
        if sample_rate == 0 {
            return Err(TranscriptionError::InvalidConfig(
                "Sample rate must be > 0".to_string(),
            ));
        }
        config.validate_onset()?;

        Ok(Self {
            sample_rate,
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            alpha: config.ewma_alpha,
            threshold_ratio: config.threshold_ratio,
            min_onset_gap: config.min_onset_gap,
        })
    }

    /// Duration of one hop in seconds
    pub fn frame_time(&self) -> f32 {
        self.hop_size as f32 / self.sample_rate as f32
    }

    /// Time in seconds of frame `index`
    pub fn frame_to_time(&self, index: usize) -> f32 {
        (index as f64 * self.hop_size as f64 / self.sample_rate as f64) as f32
    }

    /// RMS energy envelope of `samples` using the configured framing
    pub fn compute_energy(&self, samples: &[f32]) -> Vec<f32> {
        energy::compute_rms_envelope(samples, self.frame_size, self.hop_size)
    }

    /// Detect onsets with the configured threshold ratio and minimum gap
    ///
    /// Returns onset times in seconds, strictly increasing.
    pub fn detect_onsets(&self, samples: &[f32]) -> Vec<f32> {
        self.detect_onsets_with(samples, self.threshold_ratio, self.min_onset_gap)
    }

    /// Detect onsets with an explicit threshold ratio and minimum gap (seconds)
    pub fn detect_onsets_with(
        &self,
        samples: &[f32],
        threshold_ratio: f32,
        min_duration: f32,
    ) -> Vec<f32> {
        let energy = self.compute_energy(samples);
        if energy.len() < 2 {
            return Vec::new();
        }
        let baseline = ewma::ewma_filter(&energy, self.alpha);

        let candidates = select_candidates(&energy, &baseline, threshold_ratio);
        let min_frames = self.gap_in_frames(min_duration);
        let kept = debounce(&candidates, min_frames);

        log::debug!(
            "Onset detection: {} frames, {} candidates, {} kept (min gap {} frames)",
            energy.len(),
            candidates.len(),
            kept.len(),
            min_frames
        );

        kept.into_iter().map(|frame| self.frame_to_time(frame)).collect()
    }

    /// Minimum gap expressed in whole frames, rounded up so the gap in seconds
    /// is never undercut. Always at least one frame.
    fn gap_in_frames(&self, min_duration: f32) -> usize {
        let frames = (min_duration.max(0.0) as f64 * self.sample_rate as f64 / self.hop_size as f64)
            .ceil() as usize;
        frames.max(1)
    }
}

/// Frames whose energy exceeds `baseline * threshold_ratio` and rises over the
/// previous frame
///
/// Frame 0 has no predecessor and is never a candidate.
pub fn select_candidates(energy: &[f32], baseline: &[f32], threshold_ratio: f32) -> Vec<usize> {
    (1..energy.len().min(baseline.len()))
        .filter(|&i| energy[i] > baseline[i] * threshold_ratio && energy[i] > energy[i - 1])
        .collect()
}

/// Drop candidates closer than `min_frames` to the last *kept* candidate
///
/// `candidates` must be increasing.
pub fn debounce(candidates: &[usize], min_frames: usize) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::with_capacity(candidates.len());
    for &frame in candidates {
        match kept.last() {
            Some(&last) if frame - last < min_frames => {}
            _ => kept.push(frame),
        }
    }
    kept
}

/// Duration of each note given its onset and the total audio duration
///
/// Note `i` lasts until onset `i + 1`; the last note lasts until `total_duration`.
/// Empty onsets give empty durations.
///
/// # Example
///
/// ```
/// use phin_transcriber::features::onset::get_note_durations;
///
/// assert_eq!(get_note_durations(&[0.0, 0.5], 1.0), vec![0.5, 0.5]);
/// assert!(get_note_durations(&[], 3.0).is_empty());
/// ```
pub fn get_note_durations(onsets: &[f32], total_duration: f32) -> Vec<f32> {
    let Some(&last) = onsets.last() else {
        return Vec::new();
    };

    let mut durations: Vec<f32> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
    durations.push(total_duration - last);
    durations
}
