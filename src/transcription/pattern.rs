//! Pattern statistics over a transcription

use super::result::{PatternSummary, Transcription};
use std::collections::BTreeSet;

/// Summarize pitch content, durations and tempo of `transcription`
///
/// A zero-note transcription gives an all-zero summary with empty strings.
///
/// # Example
///
/// ```
/// use phin_transcriber::transcription::pattern::analyze_pattern;
/// use phin_transcriber::transcription::result::{NoteEvent, Transcription};
///
/// let note = |onset: f32| NoteEvent {
///     onset_time: onset,
///     duration: 0.5,
///     frequency: 440.0,
///     midi_note: 69,
///     note_name: "A4".to_string(),
///     thai_notation: "ล4".to_string(),
///     confidence: 1.0,
/// };
/// let transcription = Transcription {
///     notes: vec![note(0.0), note(0.5)],
///     total_notes: 2,
///     audio_duration: 1.0,
///     method_tag: "EWMA+FFT".to_string(),
/// };
/// let summary = analyze_pattern(&transcription);
/// assert_eq!(summary.tempo_estimate, 120.0);
/// ```
pub fn analyze_pattern(transcription: &Transcription) -> PatternSummary {
    let notes = &transcription.notes;
    if notes.is_empty() {
        return PatternSummary::default();
    }

    let unique_pitches = notes.iter().map(|n| n.midi_note).collect::<BTreeSet<_>>().len();

    let min_midi = notes.iter().map(|n| n.midi_note).min().unwrap_or(0);
    let max_midi = notes.iter().map(|n| n.midi_note).max().unwrap_or(0);

    let average_duration = notes.iter().map(|n| n.duration).sum::<f32>() / notes.len() as f32;

    let tempo_estimate = if notes.len() < 2 {
        0.0
    } else {
        let intervals: Vec<f32> = notes
            .windows(2)
            .map(|w| w[1].onset_time - w[0].onset_time)
            .collect();
        let mean_interval = intervals.iter().sum::<f32>() / intervals.len() as f32;
        if mean_interval > 0.0 {
            60.0 / mean_interval
        } else {
            0.0
        }
    };

    PatternSummary {
        note_count: notes.len(),
        unique_pitches,
        pitch_range: max_midi - min_midi,
        average_duration,
        tempo_estimate,
        thai_notation: transcription.thai_notation_sequence(),
        western_notation: transcription.western_notation_sequence(),
    }
}
