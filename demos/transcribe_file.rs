//! Example: Transcribe a single audio file
//!
//! Usage:
//!   cargo run --release --example transcribe_file -- [--json] [--instrument phin|khaen] [--midi out.mid] <file>
//!
//! Prints the note table and pattern summary. With `--midi`, also writes a
//! Standard MIDI File.
//!
//! Audio is analysed at its native sample rate; frame and hop sizes are scaled
//! from the 22050 Hz defaults so a hop stays ~23 ms.

use phin_transcriber::export::midi::save_midi;
use phin_transcriber::io::decoder::decode_audio;
use phin_transcriber::preprocessing::normalization::peak_normalize;
use phin_transcriber::preprocessing::quality::validate_audio_quality;
use phin_transcriber::{Transcriber, TranscriptionConfig};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut instrument = "phin".to_string();
    let mut midi_out: Option<PathBuf> = None;
    let mut path: Option<String> = None;

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--instrument" => {
                instrument = args.first().ok_or("--instrument requires a value")?.clone();
                args.remove(0);
            }
            "--midi" => {
                midi_out = Some(PathBuf::from(
                    args.first().ok_or("--midi requires a path")?,
                ));
                args.remove(0);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: transcribe_file [--json] [--instrument phin|khaen] [--midi out.mid] <file>\n\
                     \n\
                     --json          Print the transcription as JSON\n\
                     --instrument    MIDI program to use (default: phin)\n\
                     --midi PATH     Write a Standard MIDI File\n"
                );
                return Ok(());
            }
            _ => path = Some(a),
        }
    }

    let path = match path {
        Some(p) => p,
        None => {
            eprintln!("ERROR: Provide an audio file path. Use --help for usage.");
            std::process::exit(2);
        }
    };

    let t0 = Instant::now();
    let (mut samples, sample_rate) = decode_audio(Path::new(&path))?;
    peak_normalize(&mut samples);

    let quality = validate_audio_quality(&samples, sample_rate);
    if let Some(issue) = quality.issue {
        eprintln!("ERROR: {}: {}", path, issue);
        std::process::exit(1);
    }

    // Audio keeps its native rate; scale framing so hops stay ~23 ms
    let config = TranscriptionConfig::default().scaled_to_sample_rate(sample_rate);
    let transcriber = Transcriber::new(sample_rate, config)?;
    let transcription = transcriber.transcribe(&samples);
    let pattern = transcriber.analyze_pattern(&transcription);
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

    if json {
        println!("{}", serde_json::to_string_pretty(&transcription)?);
        println!("{}", serde_json::to_string_pretty(&pattern)?);
    } else {
        println!("Transcription: {}", path);
        println!(
            "  Duration: {:.2}s at {} Hz, RMS {:.3}, ZCR {:.3}",
            quality.duration_seconds, sample_rate, quality.rms_energy, quality.zero_crossing_rate
        );
        println!();
        println!(
            "  {:>3}  {:>8}  {:>8}  {:>9}  {:>4}  {:<5}  {:<6}  {:>5}",
            "#", "onset", "dur", "freq", "midi", "note", "thai", "conf"
        );
        for (i, note) in transcription.notes.iter().enumerate() {
            println!(
                "  {:>3}  {:>7.3}s  {:>7.3}s  {:>6.1} Hz  {:>4}  {:<5}  {:<6}  {:>5.2}",
                i + 1,
                note.onset_time,
                note.duration,
                note.frequency,
                note.midi_note,
                note.note_name,
                note.thai_notation,
                note.confidence
            );
        }
        println!();
        println!("Pattern:");
        println!("  Notes: {} ({} unique)", pattern.note_count, pattern.unique_pitches);
        println!("  Range: {} semitones", pattern.pitch_range);
        println!("  Average duration: {:.3}s", pattern.average_duration);
        println!("  Tempo estimate: {:.1} BPM", pattern.tempo_estimate);
        println!("  Thai: {}", pattern.thai_notation);
        println!("  Western: {}", pattern.western_notation);
        println!("  Processing time: {:.2} ms", elapsed_ms);
    }

    if let Some(out) = midi_out {
        let track = transcriber.to_midi(&transcription, &instrument);
        save_midi(&track, &out)?;
        eprintln!(
            "Wrote {} notes to {} (program {})",
            track.notes.len(),
            out.display(),
            track.program()
        );
    }

    Ok(())
}
