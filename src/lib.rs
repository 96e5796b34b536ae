//! # Phin Transcriber
//!
//! A monophonic music-transcription engine for Thai folk instruments (phin,
//! khaen). Turns raw audio into timed notes with Western and Thai solfège
//! notation, pattern statistics and MIDI export.
//!
//! ## Features
//!
//! - **Onset Detection**: RMS energy envelope against an EWMA baseline
//! - **Pitch Detection**: FFT magnitude peak picking over a C2..C7 band
//! - **Notation**: MIDI, Western note names and Thai solfège (ด ร ม ฟ ซ ล ท)
//! - **Export**: Standard MIDI File via `midly`
//!
//! ## Quick Start
//!
//! ```no_run
//! use phin_transcriber::{transcribe_audio, TranscriptionConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 22050;
//!
//! let transcription = transcribe_audio(&samples, sample_rate, TranscriptionConfig::default())?;
//!
//! for note in &transcription.notes {
//!     println!("{:.2}s {} ({})", note.onset_time, note.note_name, note.thai_notation);
//! }
//! # Ok::<(), phin_transcriber::TranscriptionError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Audio Input → Onset Detection → Pitch per Onset → Notes → Pattern / MIDI
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod export;
pub mod features;
pub mod io;
pub mod notation;
pub mod preprocessing;
pub mod transcription;

// Re-export main types
pub use config::TranscriptionConfig;
pub use error::TranscriptionError;
pub use features::onset::OnsetDetector;
pub use features::pitch::{PitchDetector, PitchEstimate};
pub use transcription::{NoteEvent, PatternSummary, Transcriber, Transcription};

/// Main transcription function
///
/// Builds a [`Transcriber`] for `sample_rate` and transcribes `samples` once.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Transcription configuration parameters
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidConfig` if the sample rate is zero or the
/// configuration is invalid. Silent or unpitched audio is not an error.
///
/// # Example
///
/// ```
/// use phin_transcriber::{transcribe_audio, TranscriptionConfig};
///
/// let samples = vec![0.0f32; 44100]; // 2 seconds of silence
/// let transcription = transcribe_audio(&samples, 22050, TranscriptionConfig::default())?;
/// assert_eq!(transcription.total_notes, 0);
/// # Ok::<(), phin_transcriber::TranscriptionError>(())
/// ```
pub fn transcribe_audio(
    samples: &[f32],
    sample_rate: u32,
    config: TranscriptionConfig,
) -> Result<Transcription, TranscriptionError> {
    use std::time::Instant;
    let start_time = Instant::now();

    log::debug!(
        "Starting transcription: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    let transcriber = Transcriber::new(sample_rate, config)?;
    let transcription = transcriber.transcribe(samples);

    log::debug!(
        "Transcription finished in {:.1} ms",
        start_time.elapsed().as_secs_f32() * 1000.0
    );

    Ok(transcription)
}
