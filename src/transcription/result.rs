//! Transcription result types

use serde::{Deserialize, Serialize};

/// Tag recorded on every transcription produced by this engine
pub const METHOD_TAG: &str = "EWMA+FFT";

/// A single transcribed note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    /// Onset time in seconds
    pub onset_time: f32,

    /// Duration in seconds, until the next onset or the end of the audio
    pub duration: f32,

    /// Detected frequency in Hz
    pub frequency: f32,

    /// MIDI note number
    pub midi_note: i32,

    /// Western note name (e.g., "C#4")
    pub note_name: String,

    /// Thai solfège (e.g., "ด4", or "ด4~" when approximated)
    pub thai_notation: String,

    /// Pitch confidence (0.0-1.0)
    pub confidence: f32,
}

/// Complete transcription of one audio buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Notes in onset order
    pub notes: Vec<NoteEvent>,

    /// Number of notes
    pub total_notes: usize,

    /// Duration of the transcribed audio in seconds
    pub audio_duration: f32,

    /// Method used to produce the notes
    pub method_tag: String,
}

impl Transcription {
    /// Space-separated Thai notation of all notes, in onset order
    pub fn thai_notation_sequence(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.thai_notation.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Space-separated Western note names of all notes, in onset order
    pub fn western_notation_sequence(&self) -> String {
        self.notes
            .iter()
            .map(|n| n.note_name.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Aggregate statistics over a transcription
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternSummary {
    /// Number of notes
    pub note_count: usize,

    /// Number of distinct MIDI notes
    pub unique_pitches: usize,

    /// Highest minus lowest MIDI note, in semitones
    pub pitch_range: i32,

    /// Mean note duration in seconds
    pub average_duration: f32,

    /// 60 / mean inter-onset interval, or 0.0 with fewer than two notes
    pub tempo_estimate: f32,

    /// Space-separated Thai notation
    pub thai_notation: String,

    /// Space-separated Western notation
    pub western_notation: String,
}
