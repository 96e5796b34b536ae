//! Exponentially weighted moving average (EWMA) baseline
//!
//! A single-pole low-pass filter over the energy envelope:
//!
//! ```text
//! s[0] = e[0]
//! s[i] = alpha * e[i] + (1 - alpha) * s[i-1]
//! ```
//!
//! The smoothed curve acts as a local noise floor that follows slow changes in
//! playing dynamics, so the onset threshold adapts across a recording.

/// Smooth `envelope` with an EWMA of factor `alpha`
///
/// Empty input returns an empty vector.
///
/// # Example
///
/// ```
/// use phin_transcriber::features::onset::ewma::ewma_filter;
///
/// let smoothed = ewma_filter(&[0.0, 1.0, 1.0], 0.5);
/// assert_eq!(smoothed, vec![0.0, 0.5, 0.75]);
/// ```
pub fn ewma_filter(envelope: &[f32], alpha: f32) -> Vec<f32> {
    let mut smoothed = Vec::with_capacity(envelope.len());
    let mut iter = envelope.iter();

    let Some(&first) = iter.next() else {
        return smoothed;
    };

    let mut state = first;
    smoothed.push(state);
    for &value in iter {
        state = alpha * value + (1.0 - alpha) * state;
        smoothed.push(state);
    }

    smoothed
}
