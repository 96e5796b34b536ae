//! Example: Transcribe multiple audio files in parallel
//!
//! Usage:
//!   cargo run --release --example transcribe_batch -- [--jobs N] [--json] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files (batch-level). Each transcription is single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.
//! - Files failing the quality check (too short, too quiet) are reported and skipped.
//! - Frame and hop sizes are scaled from the 22050 Hz defaults to each file's native rate.

use phin_transcriber::io::decoder::decode_audio;
use phin_transcriber::preprocessing::normalization::peak_normalize;
use phin_transcriber::preprocessing::quality::validate_audio_quality;
use phin_transcriber::{PatternSummary, Transcriber, TranscriptionConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

#[derive(Serialize)]
struct ItemOut {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<PatternSummary>,
    processing_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn transcribe_one(path: &str, config: &TranscriptionConfig) -> ItemOut {
    let t0 = Instant::now();
    let result = (|| -> Result<PatternSummary, String> {
        let (mut samples, sr) =
            decode_audio(Path::new(path)).map_err(|e| format!("decode failed: {e}"))?;
        peak_normalize(&mut samples);
        if let Some(issue) = validate_audio_quality(&samples, sr).issue {
            return Err(issue.to_string());
        }
        let transcriber = Transcriber::new(sr, config.scaled_to_sample_rate(sr))
            .map_err(|e| format!("transcription failed: {e}"))?;
        let transcription = transcriber.transcribe(&samples);
        Ok(transcriber.analyze_pattern(&transcription))
    })();

    let processing_time_ms = t0.elapsed().as_secs_f64() * 1000.0;
    match result {
        Ok(pattern) => ItemOut {
            file: path.to_string(),
            pattern: Some(pattern),
            processing_time_ms,
            error: None,
        },
        Err(e) => ItemOut {
            file: path.to_string(),
            pattern: None,
            processing_time_ms,
            error: Some(e),
        },
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: transcribe_batch [--jobs N] [--json] <file1> <file2> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one audio file path. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let config = TranscriptionConfig::default();

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| transcribe_one(path, &config))
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        if json {
            println!("{}", serde_json::to_string(o)?);
            continue;
        }
        match (&o.pattern, &o.error) {
            (Some(p), _) => println!(
                "[{}/{}] {}: notes={} unique={} range={} tempo={:.1} thai=\"{}\" time={:.2}ms",
                idx + 1,
                outs.len(),
                o.file,
                p.note_count,
                p.unique_pitches,
                p.pitch_range,
                p.tempo_estimate,
                p.thai_notation,
                o.processing_time_ms
            ),
            (None, err) => println!(
                "[{}/{}] {}: ERROR: {}",
                idx + 1,
                outs.len(),
                o.file,
                err.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    let ok = outs.iter().filter(|o| o.pattern.is_some()).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
