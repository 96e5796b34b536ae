//! Export formats

pub mod midi;
