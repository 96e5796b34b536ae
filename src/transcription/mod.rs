//! Note transcription
//!
//! Runs onset detection, queries the pitch at every onset and keeps the
//! confident, pitched results as [`NoteEvent`]s:
//!
//! ```text
//! detect onsets → (none? use [0.0]) → durations → pitch per onset → confidence gate → notes
//! ```

pub mod pattern;
pub mod result;

pub use result::{NoteEvent, PatternSummary, Transcription, METHOD_TAG};

use crate::config::TranscriptionConfig;
use crate::error::TranscriptionError;
use crate::export::midi::{self, MidiTrack};
use crate::features::onset::{get_note_durations, OnsetDetector};
use crate::features::pitch::PitchDetector;

/// Monophonic transcriber combining onset and pitch detection
///
/// Built once per sample rate and configuration; each call to
/// [`transcribe`](Transcriber::transcribe) is independent.
#[derive(Debug, Clone)]
pub struct Transcriber {
    sample_rate: u32,
    config: TranscriptionConfig,
    onset_detector: OnsetDetector,
    pitch_detector: PitchDetector,
}

impl Transcriber {
    /// Build a transcriber for audio at `sample_rate`
    ///
    /// # Errors
    ///
    /// Returns `TranscriptionError::InvalidConfig` if `sample_rate` is zero or
    /// `config` fails validation.
    pub fn new(sample_rate: u32, config: TranscriptionConfig) -> Result<Self, TranscriptionError> {
        config.validate()?;
        let onset_detector = OnsetDetector::new(sample_rate, &config)?;
        let pitch_detector = PitchDetector::new(sample_rate, &config)?;

        Ok(Self {
            sample_rate,
            config,
            onset_detector,
            pitch_detector,
        })
    }

    /// Sample rate this transcriber expects
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Configuration in use
    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    /// Onset detector in use
    pub fn onset_detector(&self) -> &OnsetDetector {
        &self.onset_detector
    }

    /// Pitch detector in use
    pub fn pitch_detector(&self) -> &PitchDetector {
        &self.pitch_detector
    }

    /// Transcribe mono `samples` into notes
    ///
    /// Never fails: silence or unpitched audio simply yields fewer (or zero)
    /// notes.
    pub fn transcribe(&self, samples: &[f32]) -> Transcription {
        let audio_duration = samples.len() as f32 / self.sample_rate as f32;

        let mut onsets = self.onset_detector.detect_onsets(samples);
        if onsets.is_empty() {
            log::warn!("No onsets detected, analysing a single note at 0.0s");
            onsets.push(0.0);
        }

        let durations = get_note_durations(&onsets, audio_duration);

        let mut notes = Vec::with_capacity(onsets.len());
        for (&onset_time, &duration) in onsets.iter().zip(durations.iter()) {
            let reading = self.pitch_detector.detect_pitch_at_time(samples, onset_time);

            if reading.confidence >= self.config.min_note_confidence && reading.midi_note > 0 {
                notes.push(NoteEvent {
                    onset_time,
                    duration,
                    frequency: reading.frequency,
                    midi_note: reading.midi_note,
                    note_name: reading.note_name,
                    thai_notation: reading.thai_notation,
                    confidence: reading.confidence,
                });
            }
        }

        log::debug!(
            "Transcribed {} notes from {} onsets ({:.2}s of audio)",
            notes.len(),
            onsets.len(),
            audio_duration
        );

        Transcription {
            total_notes: notes.len(),
            notes,
            audio_duration,
            method_tag: METHOD_TAG.to_string(),
        }
    }

    /// MIDI track for `transcription` at the configured tempo
    pub fn to_midi(&self, transcription: &Transcription, instrument_name: &str) -> MidiTrack {
        midi::to_midi(transcription, instrument_name, self.config.tempo_bpm)
    }

    /// Pattern statistics for `transcription`
    pub fn analyze_pattern(&self, transcription: &Transcription) -> PatternSummary {
        pattern::analyze_pattern(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: u32 = 22050;

    fn sine(freq: f32, seconds: f32) -> Vec<f32> {
        let n = (seconds * SR as f32) as usize;
        (0..n)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / SR as f32).sin())
            .collect()
    }

    #[test]
    fn test_silence_gives_no_notes() {
        let transcriber = Transcriber::new(SR, TranscriptionConfig::default()).unwrap();
        let transcription = transcriber.transcribe(&vec![0.0f32; 44100]);
        assert_eq!(transcription.total_notes, 0);
        assert!(transcription.notes.is_empty());
        assert_eq!(transcription.audio_duration, 2.0);
        assert_eq!(transcription.method_tag, METHOD_TAG);
    }

    #[test]
    fn test_empty_audio() {
        let transcriber = Transcriber::new(SR, TranscriptionConfig::default()).unwrap();
        let transcription = transcriber.transcribe(&[]);
        assert_eq!(transcription.total_notes, 0);
        assert_eq!(transcription.audio_duration, 0.0);
    }

    #[test]
    fn test_steady_tone_falls_back_to_single_note() {
        // A steady tone from the first sample has no rising edge after frame 0
        let transcriber = Transcriber::new(SR, TranscriptionConfig::default()).unwrap();
        let transcription = transcriber.transcribe(&sine(440.0, 1.0));
        assert_eq!(transcription.total_notes, 1);
        let note = &transcription.notes[0];
        assert_eq!(note.onset_time, 0.0);
        assert!((note.duration - 1.0).abs() < 1e-6);
        assert_eq!(note.midi_note, 69);
        assert_eq!(note.note_name, "A4");
        assert_eq!(note.thai_notation, "ล4");
    }

    #[test]
    fn test_confidence_gate() {
        let config = TranscriptionConfig {
            min_note_confidence: 1.0,
            ..Default::default()
        };
        let transcriber = Transcriber::new(SR, config).unwrap();
        // A pure tone reaches full confidence, so even the strictest gate passes it
        let transcription = transcriber.transcribe(&sine(440.0, 1.0));
        assert_eq!(transcription.total_notes, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TranscriptionConfig {
            hop_size: 0,
            ..Default::default()
        };
        assert!(Transcriber::new(SR, config).is_err());
        assert!(Transcriber::new(0, TranscriptionConfig::default()).is_err());
    }

    #[test]
    fn test_to_midi_uses_configured_tempo() {
        let config = TranscriptionConfig {
            tempo_bpm: 90.0,
            ..Default::default()
        };
        let transcriber = Transcriber::new(SR, config).unwrap();
        let transcription = transcriber.transcribe(&sine(440.0, 1.0));
        let track = transcriber.to_midi(&transcription, "phin");
        assert_eq!(track.tempo_bpm, 90.0);
        assert_eq!(track.program(), 24);
        assert_eq!(track.notes.len(), transcription.total_notes);
    }
}
