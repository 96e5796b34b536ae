//! Integration tests for the transcription engine

use phin_transcriber::export::midi::{write_smf, Instrument};
use phin_transcriber::features::onset::get_note_durations;
use phin_transcriber::io::decoder::decode_audio;
use phin_transcriber::transcription::pattern::analyze_pattern;
use phin_transcriber::transcription::result::METHOD_TAG;
use phin_transcriber::{
    transcribe_audio, NoteEvent, OnsetDetector, Transcriber, Transcription, TranscriptionConfig,
};
use std::path::PathBuf;

const SR: u32 = 22050;
const BLOCK: usize = 512;

/// Frame and hop of one block, so frame boundaries line up with tone boundaries
fn aligned_config() -> TranscriptionConfig {
    TranscriptionConfig {
        frame_size: BLOCK,
        hop_size: BLOCK,
        ..Default::default()
    }
}

/// Silence, then tones separated by silence; every segment a whole number of blocks
///
/// Layout: 9 blocks lead-in, 17 blocks per tone, 9 blocks between and after tones.
fn aligned_melody(freqs: &[f32]) -> Vec<f32> {
    let mut samples = vec![0.0f32; 9 * BLOCK];
    for &freq in freqs {
        samples.extend((0..17 * BLOCK).map(|n| {
            0.5 * (2.0 * std::f32::consts::PI * freq * n as f32 / SR as f32).sin()
        }));
        samples.extend(std::iter::repeat(0.0).take(9 * BLOCK));
    }
    samples
}

/// Decaying plucks at the given times
fn plucks(duration_seconds: f32, onsets: &[(f32, f32)]) -> Vec<f32> {
    let num_samples = (duration_seconds * SR as f32) as usize;
    let mut samples = vec![0.0f32; num_samples];
    for &(onset, freq) in onsets {
        let start = (onset * SR as f32) as usize;
        for (n, s) in samples[start..].iter_mut().enumerate() {
            let t = n as f32 / SR as f32;
            *s += 0.8 * (-t * 8.0).exp() * (2.0 * std::f32::consts::PI * freq * t).sin();
        }
    }
    samples
}

fn note(onset_time: f32, duration: f32, midi_note: i32) -> NoteEvent {
    NoteEvent {
        onset_time,
        duration,
        frequency: 440.0,
        midi_note,
        note_name: "A4".to_string(),
        thai_notation: "ล4".to_string(),
        confidence: 1.0,
    }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("phin_{}_{}", std::process::id(), name))
}

#[test]
fn test_silence_yields_no_notes() {
    let samples = vec![0.0f32; 44100];
    let transcription = transcribe_audio(&samples, SR, TranscriptionConfig::default())
        .expect("Transcription should succeed");

    assert_eq!(transcription.total_notes, 0);
    assert!(transcription.notes.is_empty());
    assert_eq!(transcription.audio_duration, 2.0);
    assert_eq!(transcription.method_tag, METHOD_TAG);
}

#[test]
fn test_pattern_of_empty_transcription() {
    let transcription = transcribe_audio(&vec![0.0f32; 44100], SR, TranscriptionConfig::default())
        .expect("Transcription should succeed");
    let summary = analyze_pattern(&transcription);

    assert_eq!(summary.note_count, 0);
    assert_eq!(summary.unique_pitches, 0);
    assert_eq!(summary.pitch_range, 0);
    assert_eq!(summary.average_duration, 0.0);
    assert_eq!(summary.tempo_estimate, 0.0);
    assert!(summary.thai_notation.is_empty());
    assert!(summary.western_notation.is_empty());
}

#[test]
fn test_two_notes_at_120_bpm() {
    let durations = get_note_durations(&[0.0, 0.5], 1.0);
    assert_eq!(durations, vec![0.5, 0.5]);

    let transcription = Transcription {
        notes: vec![note(0.0, durations[0], 69), note(0.5, durations[1], 69)],
        total_notes: 2,
        audio_duration: 1.0,
        method_tag: METHOD_TAG.to_string(),
    };
    let summary = analyze_pattern(&transcription);
    assert_eq!(summary.tempo_estimate, 120.0);
    assert_eq!(summary.unique_pitches, 1);
    assert_eq!(summary.average_duration, 0.5);
}

#[test]
fn test_aligned_melody() {
    let samples = aligned_melody(&[440.0, 523.25, 659.26]);
    let transcriber = Transcriber::new(SR, aligned_config()).expect("Valid config");
    let transcription = transcriber.transcribe(&samples);

    assert_eq!(
        transcription.total_notes, 3,
        "notes: {:?}",
        transcription.notes
    );

    let names: Vec<&str> = transcription.notes.iter().map(|n| n.note_name.as_str()).collect();
    assert_eq!(names, vec!["A4", "C5", "E5"]);
    assert_eq!(transcription.thai_notation_sequence(), "ล4 ด5 ม5");

    // Onsets land on the first block of each tone
    let block_time = BLOCK as f32 / SR as f32;
    for (note, block) in transcription.notes.iter().zip([9usize, 35, 61]) {
        assert!(
            (note.onset_time - block as f32 * block_time).abs() < 1e-4,
            "onset {} for block {}",
            note.onset_time,
            block
        );
        assert!(note.confidence > 0.9, "confidence {}", note.confidence);
    }

    let summary = transcriber.analyze_pattern(&transcription);
    assert_eq!(summary.note_count, 3);
    assert_eq!(summary.unique_pitches, 3);
    assert_eq!(summary.pitch_range, 7);
    let expected_tempo = 60.0 / (26.0 * block_time);
    assert!((summary.tempo_estimate - expected_tempo).abs() < 0.1);
}

#[test]
fn test_durations_cover_audio() {
    let samples = aligned_melody(&[440.0, 523.25, 659.26]);
    let transcriber = Transcriber::new(SR, aligned_config()).expect("Valid config");
    let transcription = transcriber.transcribe(&samples);

    let total: f32 = transcription.notes.iter().map(|n| n.duration).sum();
    let first_onset = transcription.notes.first().map(|n| n.onset_time).unwrap_or(0.0);
    assert!(
        (total + first_onset - transcription.audio_duration).abs() < 1e-4,
        "durations {} + lead {} vs audio {}",
        total,
        first_onset,
        transcription.audio_duration
    );
    assert!(transcription.notes.iter().all(|n| n.duration >= 0.0));
}

#[test]
fn test_onsets_respect_min_gap() {
    let samples = plucks(3.0, &[(0.25, 330.0), (0.9, 392.0), (1.6, 440.0), (2.3, 523.25)]);
    let config = TranscriptionConfig::default();
    let detector = OnsetDetector::new(SR, &config).expect("Valid config");
    let onsets = detector.detect_onsets(&samples);

    assert!(!onsets.is_empty());
    for w in onsets.windows(2) {
        assert!(w[1] > w[0]);
        assert!(w[1] - w[0] >= config.min_onset_gap - 1e-6);
    }
}

#[test]
fn test_transcription_is_deterministic() {
    let samples = plucks(3.0, &[(0.25, 330.0), (0.9, 392.0), (1.6, 440.0), (2.3, 523.25)]);
    let transcriber = Transcriber::new(SR, TranscriptionConfig::default()).expect("Valid config");

    let first = transcriber.transcribe(&samples);
    let second = transcriber.transcribe(&samples);
    assert_eq!(first, second);
}

#[test]
fn test_wav_round_trip() {
    let samples = aligned_melody(&[440.0, 523.25, 659.26]);
    let path = temp_path("melody.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SR,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).expect("Create WAV");
    for &s in &samples {
        writer
            .write_sample((s * i16::MAX as f32) as i16)
            .expect("Write sample");
    }
    writer.finalize().expect("Finalize WAV");

    let (decoded, sample_rate) = decode_audio(&path).expect("Decode WAV");
    std::fs::remove_file(&path).ok();

    assert_eq!(sample_rate, SR);
    assert_eq!(decoded.len(), samples.len());

    let transcription = transcribe_audio(&decoded, sample_rate, aligned_config())
        .expect("Transcription should succeed");
    assert_eq!(transcription.western_notation_sequence(), "A4 C5 E5");
}

#[test]
fn test_midi_export() {
    let samples = aligned_melody(&[440.0, 523.25, 659.26]);
    let transcriber = Transcriber::new(SR, aligned_config()).expect("Valid config");
    let transcription = transcriber.transcribe(&samples);

    let track = transcriber.to_midi(&transcription, "khaen");
    assert_eq!(track.instrument, Instrument::Khaen);
    assert_eq!(track.program(), 22);
    let keys: Vec<u8> = track.notes.iter().map(|n| n.key).collect();
    assert_eq!(keys, vec![69, 72, 76]);

    let bytes = write_smf(&track).expect("Write SMF");
    let smf = midly::Smf::parse(&bytes).expect("Parse SMF");
    assert_eq!(smf.tracks.len(), 1);
    let note_ons = smf.tracks[0]
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                midly::TrackEventKind::Midi {
                    message: midly::MidiMessage::NoteOn { .. },
                    ..
                }
            )
        })
        .count();
    assert_eq!(note_ons, 3);
}
