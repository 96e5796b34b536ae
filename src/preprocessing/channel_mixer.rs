//! Channel mixing utilities (multi-channel to mono conversion)

use crate::error::TranscriptionError;

/// Average interleaved multi-channel samples down to mono
///
/// # Arguments
///
/// * `interleaved` - Samples ordered frame by frame (`L R L R ...` for stereo)
/// * `channels` - Number of interleaved channels
///
/// # Returns
///
/// Mono samples, one per frame. A trailing partial frame is dropped.
///
/// # Errors
///
/// Returns `TranscriptionError::InvalidInput` if `channels` is zero
pub fn downmix_interleaved(
    interleaved: &[f32],
    channels: usize,
) -> Result<Vec<f32>, TranscriptionError> {
    match channels {
        0 => Err(TranscriptionError::InvalidInput(
            "Channel count must be > 0".to_string(),
        )),
        1 => Ok(interleaved.to_vec()),
        n => Ok(interleaved
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(downmix_interleaved(&samples, 1).unwrap(), samples);
    }

    #[test]
    fn test_stereo_average() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix_interleaved(&samples, 2).unwrap(), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_partial_frame_dropped() {
        let samples = vec![0.3, 0.3, 0.3, 0.9];
        assert_eq!(downmix_interleaved(&samples, 3).unwrap().len(), 1);
    }

    #[test]
    fn test_zero_channels_rejected() {
        assert!(downmix_interleaved(&[0.0], 0).is_err());
    }
}
