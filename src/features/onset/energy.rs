//! Frame-wise RMS energy envelope
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS amplitude per frame: sqrt(mean(x²))
//!
//! Frame `i` starts at sample `i * hop_size`, so its time is
//! `i * hop_size / sample_rate`. Frames are not centred or padded.
//!
//! # Example
//!
//! ```
//! use phin_transcriber::features::onset::energy::compute_rms_envelope;
//!
//! let samples = vec![0.5f32; 4096];
//! let envelope = compute_rms_envelope(&samples, 2048, 512);
//! assert_eq!(envelope.len(), 5);
//! assert!((envelope[0] - 0.5).abs() < 1e-6);
//! ```

/// Compute the RMS energy envelope of `samples`
///
/// Output length is `floor((len - frame_size) / hop_size) + 1`. Input shorter
/// than one frame yields a single frame covering all of it; empty input yields
/// an empty envelope.
///
/// `frame_size` and `hop_size` must be non-zero; the detectors validate this at
/// construction.
pub fn compute_rms_envelope(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    if samples.len() < frame_size {
        log::warn!(
            "Audio length ({}) shorter than frame size ({}), using a single frame",
            samples.len(),
            frame_size
        );
        return vec![frame_rms(samples)];
    }

    let num_frames = (samples.len() - frame_size) / hop_size + 1;
    let mut envelope = Vec::with_capacity(num_frames);

    for i in 0..num_frames {
        let start = i * hop_size;
        envelope.push(frame_rms(&samples[start..start + frame_size]));
    }

    log::debug!(
        "Computed RMS envelope: {} frames (frame={}, hop={})",
        envelope.len(),
        frame_size,
        hop_size
    );

    envelope
}

fn frame_rms(frame: &[f32]) -> f32 {
    let sum_sq: f32 = frame.iter().map(|&x| x * x).sum();
    (sum_sq / frame.len() as f32).sqrt()
}
