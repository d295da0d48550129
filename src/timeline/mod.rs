//! Timeline synthesis
//!
//! Turns detected events plus user settings into an ordered clip sequence:
//! - Cut-point scheduling (beat-locked, metronome, legacy walkers)
//! - Source segment allocation with used-range tracking
//! - Rhythm-segment stride overrides

pub mod allocator;
pub mod clip;
pub mod rhythm;
pub mod scheduler;

pub use clip::{MediaItem, MediaKind, TimelineClip};
pub use scheduler::generate_timeline;
