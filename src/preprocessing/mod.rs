//! Audio preprocessing modules
//!
//! Collaborator steps run before transcription:
//! - Channel mixing (multi-channel to mono)
//! - Peak normalization
//! - Quality validation (too short, too quiet)

pub mod channel_mixer;
pub mod normalization;
pub mod quality;
