//! Peak detection over 1D magnitude curves
//!
//! A peak is an interior local maximum: strictly greater than its left
//! neighbour and strictly greater than the first differing value to its right.
//! Flat tops count once, at the middle of the plateau. The first and last
//! samples are never peaks, so a monotonic curve has none.

/// Find peaks in `signal` whose height is at least `min_height`
///
/// # Returns
///
/// Vector of (index, value) pairs in ascending index order
///
/// # Example
///
/// ```
/// use phin_transcriber::features::pitch::peak_picking::find_peaks;
///
/// let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
/// let peaks = find_peaks(&signal, 0.5);
/// assert_eq!(peaks, vec![(2, 1.0), (5, 0.9)]);
/// ```
pub fn find_peaks(signal: &[f32], min_height: f32) -> Vec<(usize, f32)> {
    if signal.len() < 3 {
        return vec![];
    }

    let last = signal.len() - 1;
    let mut peaks = Vec::new();
    let mut i = 1;

    while i < last {
        if signal[i - 1] < signal[i] {
            // Walk across a possible plateau
            let mut ahead = i + 1;
            while ahead < last && signal[ahead] == signal[i] {
                ahead += 1;
            }

            if signal[ahead] < signal[i] {
                let mid = (i + ahead - 1) / 2;
                if signal[mid] >= min_height {
                    peaks.push((mid, signal[mid]));
                }
                i = ahead;
            }
        }
        i += 1;
    }

    log::debug!(
        "Found {} peaks (min height {:.4}) in {} values",
        peaks.len(),
        min_height,
        signal.len()
    );

    peaks
}

/// Tallest entry of a peak list; the earliest one wins ties
pub fn tallest_peak(peaks: &[(usize, f32)]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for &(idx, value) in peaks {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((idx, value)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_peaks_basic() {
        let signal = vec![0.0, 0.5, 1.0, 0.7, 0.3, 0.9, 0.2];
        let peaks = find_peaks(&signal, 0.0);
        assert_eq!(peaks, vec![(2, 1.0), (5, 0.9)]);
    }

    #[test]
    fn test_find_peaks_too_short() {
        assert!(find_peaks(&[], 0.0).is_empty());
        assert!(find_peaks(&[1.0, 2.0], 0.0).is_empty());
    }

    #[test]
    fn test_find_peaks_edges_excluded() {
        assert!(find_peaks(&[1.0, 0.5, 0.3], 0.0).is_empty());
        assert!(find_peaks(&[0.3, 0.5, 1.0], 0.0).is_empty());
    }

    #[test]
    fn test_find_peaks_height_filter() {
        let signal = vec![0.0, 0.2, 0.0, 1.0, 0.0, 0.35, 0.0];
        let peaks = find_peaks(&signal, 0.3);
        assert_eq!(peaks, vec![(3, 1.0), (5, 0.35)]);
    }

    #[test]
    fn test_find_peaks_plateau_midpoint() {
        let signal = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(find_peaks(&signal, 0.0), vec![(2, 1.0)]);

        let signal = vec![0.0, 1.0, 1.0, 0.0];
        assert_eq!(find_peaks(&signal, 0.0), vec![(1, 1.0)]);

        // Plateau running into the edge is not a peak
        let signal = vec![0.0, 1.0, 1.0, 1.0];
        assert!(find_peaks(&signal, 0.0).is_empty());
    }

    #[test]
    fn test_flat_signal_has_no_peaks() {
        assert!(find_peaks(&[0.5; 16], 0.0).is_empty());
    }

    #[test]
    fn test_tallest_peak_tie_keeps_first() {
        let peaks = vec![(3, 0.8), (7, 0.9), (11, 0.9)];
        assert_eq!(tallest_peak(&peaks), Some((7, 0.9)));
        assert_eq!(tallest_peak(&[]), None);
    }
}
