//! Feature extraction
//!
//! Rhythmic and structural event detection on mono PCM:
//! - Onset/beat detection (energy flux with adaptive thresholding)
//! - Structural detectors (silence gaps, downbeats, phrases, intensity,
//!   harmonic shifts)
//! - Tempo estimation

pub mod onset;
pub mod structure;
pub mod tempo;
