//! Pitch notation: frequency ↔ MIDI, Western note names, Thai solfège
//!
//! All conversions use twelve-tone equal temperament referenced to A4 = 440 Hz
//! (MIDI note 69).
//!
//! Thai notation uses the seven degree symbols ด ร ม ฟ ซ ล ท, placed on the
//! major-scale semitone offsets 0, 2, 4, 5, 7, 9, 11 above C. Chromatic pitch
//! classes have no symbol of their own; they are approximated by the nearest
//! degree and flagged with a trailing `~`. When two degrees are equally near
//! (every chromatic pitch class sits exactly between two), the lower one wins.
//!
//! # Example
//!
//! ```
//! use phin_transcriber::notation::{frequency_to_midi, midi_to_note_name, midi_to_thai_notation};
//!
//! let midi = frequency_to_midi(440.0);
//! assert_eq!(midi, 69);
//! assert_eq!(midi_to_note_name(midi), "A4");
//! assert_eq!(midi_to_thai_notation(midi), "ล4");
//! assert_eq!(midi_to_thai_notation(61), "ด4~");
//! ```

use crate::error::TranscriptionError;

/// Reference frequency of A4
pub const A4_FREQUENCY: f32 = 440.0;

/// MIDI note number of A4
pub const A4_MIDI: i32 = 69;

/// Placeholder returned for a missing pitch
pub const NO_PITCH: &str = "N/A";

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// (semitone offset above C, Thai degree symbol), in ascending offset order
const THAI_DEGREES: [(i32, &str); 7] = [
    (0, "ด"),
    (2, "ร"),
    (4, "ม"),
    (5, "ฟ"),
    (7, "ซ"),
    (9, "ล"),
    (11, "ท"),
];

/// Convert a frequency to the nearest MIDI note number
///
/// Returns `0` for non-positive (or NaN) frequencies, the "no pitch" sentinel.
pub fn frequency_to_midi(frequency: f32) -> i32 {
    if !(frequency > 0.0) {
        return 0;
    }
    let midi = A4_MIDI as f64 + 12.0 * (frequency as f64 / A4_FREQUENCY as f64).log2();
    midi.round() as i32
}

/// Convert a MIDI note number to its equal-tempered frequency in Hz
pub fn midi_to_frequency(midi: i32) -> f32 {
    (A4_FREQUENCY as f64 * 2.0f64.powf((midi - A4_MIDI) as f64 / 12.0)) as f32
}

/// Octave number in scientific pitch notation (MIDI 60 = C4)
fn octave_of(midi: i32) -> i32 {
    midi.div_euclid(12) - 1
}

/// Convert a MIDI note number to a Western note name such as `"C#4"`
///
/// Returns [`NO_PITCH`] for `midi <= 0`.
pub fn midi_to_note_name(midi: i32) -> String {
    if midi <= 0 {
        return NO_PITCH.to_string();
    }
    format!("{}{}", NOTE_NAMES[midi.rem_euclid(12) as usize], octave_of(midi))
}

/// Convert a MIDI note number to Thai notation such as `"ซ4"` or `"ฟ4~"`
///
/// Returns [`NO_PITCH`] for `midi <= 0`.
pub fn midi_to_thai_notation(midi: i32) -> String {
    if midi <= 0 {
        return NO_PITCH.to_string();
    }

    let pitch_class = midi.rem_euclid(12);
    let octave = octave_of(midi);

    if let Some((_, symbol)) = THAI_DEGREES.iter().find(|(offset, _)| *offset == pitch_class) {
        return format!("{}{}", symbol, octave);
    }

    // Strict `<` keeps the first (lowest) degree on ties
    let mut nearest = THAI_DEGREES[0];
    for degree in THAI_DEGREES.iter().skip(1) {
        if (degree.0 - pitch_class).abs() < (nearest.0 - pitch_class).abs() {
            nearest = *degree;
        }
    }
    format!("{}{}~", nearest.1, octave)
}

/// Lowest octave accepted by [`note_to_midi`] (`C-1` is MIDI 0)
pub const MIN_OCTAVE: i32 = -1;

/// Highest octave accepted by [`note_to_midi`]
pub const MAX_OCTAVE: i32 = 9;

/// Parse a note name such as `"C2"`, `"F#4"`, `"Bb3"` or `"C-1"` into a MIDI number
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidConfig` if the name is malformed or the
/// octave lies outside `MIN_OCTAVE..=MAX_OCTAVE`.
pub fn note_to_midi(name: &str) -> Result<i32, TranscriptionError> {
    let invalid = || TranscriptionError::InvalidConfig(format!("Invalid note name: {:?}", name));

    let mut chars = name.trim().chars().peekable();
    let letter = chars.next().ok_or_else(invalid)?;
    let pitch_class = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(invalid()),
    };

    let mut accidental = 0;
    while let Some(&c) = chars.peek() {
        match c {
            '#' | '♯' => accidental += 1,
            'b' | '♭' => accidental -= 1,
            _ => break,
        }
        chars.next();
    }

    let octave_str: String = chars.collect();
    let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
        return Err(invalid());
    }

    (octave + 1)
        .checked_mul(12)
        .and_then(|m| m.checked_add(pitch_class))
        .and_then(|m| m.checked_add(accidental))
        .ok_or_else(invalid)
}

/// Frequency in Hz of a named note
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidConfig` if the name is malformed.
pub fn note_to_frequency(name: &str) -> Result<f32, TranscriptionError> {
    note_to_midi(name).map(midi_to_frequency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_to_midi_reference_points() {
        assert_eq!(frequency_to_midi(440.0), 69);
        assert_eq!(frequency_to_midi(261.63), 60);
        assert_eq!(frequency_to_midi(65.41), 36);
        assert_eq!(frequency_to_midi(2093.0), 96);
        // Quarter-tone sharp of A4 still rounds to A4
        assert_eq!(frequency_to_midi(446.0), 69);
    }

    #[test]
    fn test_frequency_to_midi_sentinel() {
        assert_eq!(frequency_to_midi(0.0), 0);
        assert_eq!(frequency_to_midi(-12.0), 0);
        assert_eq!(frequency_to_midi(f32::NAN), 0);
    }

    #[test]
    fn test_midi_to_note_name() {
        assert_eq!(midi_to_note_name(60), "C4");
        assert_eq!(midi_to_note_name(61), "C#4");
        assert_eq!(midi_to_note_name(69), "A4");
        assert_eq!(midi_to_note_name(36), "C2");
        assert_eq!(midi_to_note_name(11), "B-1");
        assert_eq!(midi_to_note_name(0), NO_PITCH);
        assert_eq!(midi_to_note_name(-5), NO_PITCH);
    }

    #[test]
    fn test_thai_diatonic_degrees() {
        let expected = ["ด4", "ร4", "ม4", "ฟ4", "ซ4", "ล4", "ท4"];
        for ((offset, _), want) in THAI_DEGREES.iter().zip(expected) {
            let notation = midi_to_thai_notation(60 + offset);
            assert_eq!(notation, want);
            assert!(!notation.ends_with('~'));
        }
    }

    #[test]
    fn test_thai_chromatic_prefers_lower_degree() {
        assert_eq!(midi_to_thai_notation(61), "ด4~");
        assert_eq!(midi_to_thai_notation(63), "ร4~");
        assert_eq!(midi_to_thai_notation(66), "ฟ4~");
        assert_eq!(midi_to_thai_notation(68), "ซ4~");
        assert_eq!(midi_to_thai_notation(70), "ล4~");
    }

    #[test]
    fn test_thai_approximation_flag_every_octave() {
        for midi in 1..128 {
            let notation = midi_to_thai_notation(midi);
            let diatonic = THAI_DEGREES.iter().any(|(o, _)| *o == midi % 12);
            assert_eq!(notation.ends_with('~'), !diatonic, "midi {}: {}", midi, notation);
        }
        assert_eq!(midi_to_thai_notation(0), NO_PITCH);
    }

    #[test]
    fn test_note_to_midi_parsing() {
        assert_eq!(note_to_midi("C2").unwrap(), 36);
        assert_eq!(note_to_midi("C7").unwrap(), 96);
        assert_eq!(note_to_midi("A4").unwrap(), 69);
        assert_eq!(note_to_midi("F#4").unwrap(), 66);
        assert_eq!(note_to_midi("Bb3").unwrap(), 58);
        assert_eq!(note_to_midi("c-1").unwrap(), 0);
        assert!(note_to_midi("").is_err());
        assert!(note_to_midi("H2").is_err());
        assert!(note_to_midi("C").is_err());
        assert!(note_to_midi("C#x").is_err());
    }

    #[test]
    fn test_note_to_midi_octave_range() {
        assert_eq!(note_to_midi("B9").unwrap(), 131);
        assert!(note_to_midi("C10").is_err());
        assert!(note_to_midi("C-2").is_err());
        assert!(note_to_midi("C999999999").is_err());
        assert!(note_to_midi("C-2147483648").is_err());
        assert!(note_to_frequency("C999999999").is_err());
    }

    #[test]
    fn test_note_to_frequency_bounds() {
        let c2 = note_to_frequency("C2").unwrap();
        let c7 = note_to_frequency("C7").unwrap();
        assert!((c2 - 65.406).abs() < 0.01, "C2 = {}", c2);
        assert!((c7 - 2093.005).abs() < 0.05, "C7 = {}", c7);
    }

    #[test]
    fn test_midi_name_round_trip_from_frequency() {
        for midi in 36..=96 {
            let freq = midi_to_frequency(midi);
            assert_eq!(frequency_to_midi(freq), midi);
            assert_eq!(midi_to_note_name(frequency_to_midi(freq)), midi_to_note_name(midi));
        }
    }
}
