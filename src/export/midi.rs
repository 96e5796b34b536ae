//! MIDI export
//!
//! [`to_midi`] turns a [`Transcription`] into an in-memory [`MidiTrack`]: one
//! note-on/note-off pair per note at a fixed velocity. [`write_smf`] serializes
//! a track to a single-track Standard MIDI File with midly, and [`save_midi`]
//! writes that file to disk.

use crate::error::TranscriptionError;
use crate::transcription::result::Transcription;
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

/// Velocity used for every exported note
pub const NOTE_VELOCITY: u8 = 100;

/// Pulses per quarter note in written files
pub const TICKS_PER_QUARTER: u16 = 960;

/// Largest tempo in microseconds per quarter note a Set Tempo event can hold
pub const MAX_TEMPO_USPQ: u32 = 0xFF_FFFF;

/// Largest delta time in ticks a track event can hold
const MAX_DELTA_TICKS: u64 = 0x0FFF_FFFF;

const CHANNEL: u8 = 0;

/// Instruments with a dedicated General MIDI program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    /// Khaen (mouth organ), exported as Harmonica
    Khaen,
    /// Phin (lute) and anything unrecognised, exported as Acoustic Guitar (nylon)
    Phin,
}

impl Instrument {
    /// Resolve an instrument from a free-form name
    ///
    /// Names containing "khaen" (any case) map to [`Instrument::Khaen`];
    /// everything else maps to [`Instrument::Phin`].
    pub fn from_name(name: &str) -> Self {
        if name.to_lowercase().contains("khaen") {
            Instrument::Khaen
        } else {
            Instrument::Phin
        }
    }

    /// Zero-based General MIDI program number
    pub fn program(&self) -> u8 {
        match self {
            Instrument::Khaen => 22,
            Instrument::Phin => 24,
        }
    }
}

/// A note with start and end times in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiNote {
    /// MIDI key (0-127)
    pub key: u8,
    /// Note-on velocity
    pub velocity: u8,
    /// Start time in seconds
    pub start: f32,
    /// End time in seconds
    pub end: f32,
}

/// Note-on or note-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MidiEventKind {
    /// Key released (sorts first at equal times)
    NoteOff,
    /// Key pressed
    NoteOn,
}

/// A timed note-on or note-off
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MidiEvent {
    /// Time in seconds
    pub time: f32,
    /// Event kind
    pub kind: MidiEventKind,
    /// MIDI key
    pub key: u8,
    /// Velocity (0 for note-off)
    pub velocity: u8,
}

/// A single-instrument note track ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct MidiTrack {
    /// Name the track was exported under
    pub instrument_name: String,
    /// Resolved instrument
    pub instrument: Instrument,
    /// Tempo in BPM
    pub tempo_bpm: f32,
    /// Notes in onset order
    pub notes: Vec<MidiNote>,
}

impl MidiTrack {
    /// General MIDI program of the track's instrument
    pub fn program(&self) -> u8 {
        self.instrument.program()
    }

    /// Note-on/note-off events sorted by time, note-offs first at equal times
    pub fn events(&self) -> Vec<MidiEvent> {
        let mut events = Vec::with_capacity(self.notes.len() * 2);
        for note in &self.notes {
            events.push(MidiEvent {
                time: note.start,
                kind: MidiEventKind::NoteOn,
                key: note.key,
                velocity: note.velocity,
            });
            events.push(MidiEvent {
                time: note.end,
                kind: MidiEventKind::NoteOff,
                key: note.key,
                velocity: 0,
            });
        }
        events.sort_by(|a, b| a.time.total_cmp(&b.time).then(a.kind.cmp(&b.kind)));
        events
    }
}

/// Build a MIDI track from `transcription`
///
/// # Example
///
/// ```
/// use phin_transcriber::export::midi::{to_midi, Instrument};
/// use phin_transcriber::transcription::result::Transcription;
///
/// let empty = Transcription {
///     notes: vec![],
///     total_notes: 0,
///     audio_duration: 1.0,
///     method_tag: "EWMA+FFT".to_string(),
/// };
/// let track = to_midi(&empty, "Khaen", 120.0);
/// assert_eq!(track.instrument, Instrument::Khaen);
/// assert_eq!(track.program(), 22);
/// ```
pub fn to_midi(transcription: &Transcription, instrument_name: &str, tempo_bpm: f32) -> MidiTrack {
    let notes = transcription
        .notes
        .iter()
        .map(|note| MidiNote {
            key: note.midi_note.clamp(0, 127) as u8,
            velocity: NOTE_VELOCITY,
            start: note.onset_time,
            end: note.onset_time + note.duration,
        })
        .collect();

    MidiTrack {
        instrument_name: instrument_name.to_string(),
        instrument: Instrument::from_name(instrument_name),
        tempo_bpm,
        notes,
    }
}

/// Microseconds per quarter note for `tempo_bpm`
///
/// `None` when the tempo is not a positive finite number or is too slow for a
/// Set Tempo event (below about 3.58 BPM).
///
/// ```
/// use phin_transcriber::export::midi::tempo_to_uspq;
///
/// assert_eq!(tempo_to_uspq(120.0), Some(500_000));
/// assert_eq!(tempo_to_uspq(3.0), None);
/// ```
pub fn tempo_to_uspq(tempo_bpm: f32) -> Option<u32> {
    if !(tempo_bpm.is_finite() && tempo_bpm > 0.0) {
        return None;
    }
    let uspq = (60_000_000.0 / tempo_bpm as f64).round();
    if uspq < 1.0 || uspq > MAX_TEMPO_USPQ as f64 {
        return None;
    }
    Some(uspq as u32)
}

/// Convert seconds to ticks at the track tempo
fn seconds_to_ticks(seconds: f32, tempo_bpm: f32) -> u64 {
    let ticks = seconds.max(0.0) as f64 * TICKS_PER_QUARTER as f64 * tempo_bpm as f64 / 60.0;
    ticks.round() as u64
}

/// Serialize `track` to Standard MIDI File bytes
///
/// # Errors
///
/// Returns `TranscriptionError::ExportError` if the tempo cannot be encoded,
/// two consecutive events are further apart than a delta time can express, or
/// midly fails to write the file.
pub fn write_smf(track: &MidiTrack) -> Result<Vec<u8>, TranscriptionError> {
    let tempo_uspq = tempo_to_uspq(track.tempo_bpm).ok_or_else(|| {
        TranscriptionError::ExportError(format!(
            "Tempo must be a positive BPM no slower than {} us per quarter note, got {}",
            MAX_TEMPO_USPQ, track.tempo_bpm
        ))
    })?;
    let channel = u4::from(CHANNEL);

    let mut track_events = vec![
        TrackEvent {
            delta: u28::from(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(track.instrument_name.as_bytes())),
        },
        TrackEvent {
            delta: u28::from(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::from(tempo_uspq))),
        },
        TrackEvent {
            delta: u28::from(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::from(track.program()),
                },
            },
        },
    ];

    let mut current_tick = 0u64;
    for event in track.events() {
        let tick = seconds_to_ticks(event.time, track.tempo_bpm);
        let delta = tick.saturating_sub(current_tick);
        if delta > MAX_DELTA_TICKS {
            return Err(TranscriptionError::ExportError(format!(
                "Gap of {} ticks before event at {:.3}s exceeds the MIDI delta-time limit",
                delta, event.time
            )));
        }
        current_tick = current_tick.max(tick);

        let message = match event.kind {
            MidiEventKind::NoteOn => MidiMessage::NoteOn {
                key: u7::from(event.key),
                vel: u7::from(event.velocity),
            },
            MidiEventKind::NoteOff => MidiMessage::NoteOff {
                key: u7::from(event.key),
                vel: u7::from(0),
            },
        };

        track_events.push(TrackEvent {
            delta: u28::from(delta as u32),
            kind: TrackEventKind::Midi { channel, message },
        });
    }

    track_events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(u15::from(TICKS_PER_QUARTER)),
        },
        tracks: vec![track_events],
    };

    let mut bytes = Vec::new();
    smf.write(&mut bytes).map_err(|e| {
        TranscriptionError::ExportError(format!("Failed to write MIDI data: {:?}", e))
    })?;

    log::debug!(
        "Wrote MIDI track '{}' ({} notes, program {}, {} bytes)",
        track.instrument_name,
        track.notes.len(),
        track.program(),
        bytes.len()
    );

    Ok(bytes)
}

/// Write `track` as a Standard MIDI File at `path`, creating parent directories
///
/// # Errors
///
/// Returns `TranscriptionError::ExportError` on serialization or I/O failure.
pub fn save_midi(track: &MidiTrack, path: &Path) -> Result<(), TranscriptionError> {
    let bytes = write_smf(track)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
