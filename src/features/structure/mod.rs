//! Structural detectors
//!
//! Specialized analyses built atop the beat detector or the raw energy
//! envelope. All operate on the unfiltered buffer:
//! - Silence gaps (sound-resume boundaries)
//! - Downbeats (bar starts)
//! - Phrases (groups of downbeats)
//! - Intensity changes (build-ups and drops)
//! - Harmonic shifts (coarse tonal movement)

pub mod downbeat;
pub mod harmonic;
pub mod intensity;
pub mod phrase;
pub mod silence;

pub use downbeat::estimate_downbeats;
pub use harmonic::detect_harmonic_changes;
pub use intensity::detect_intensity_changes;
pub use phrase::estimate_phrases;
pub use silence::detect_silence_gaps;
