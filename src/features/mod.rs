//! Feature extraction modules
//!
//! - Onset detection (RMS energy envelope + EWMA baseline)
//! - Pitch detection (FFT magnitude peak picking)

pub mod onset;
pub mod pitch;
