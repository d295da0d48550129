//! # beatcut
//!
//! An audio-driven cut-list generation engine for automatic music video
//! edits: analyzes a decoded music track for rhythmic event timestamps
//! (beats, onsets, silence gaps, phrase boundaries, intensity and harmonic
//! shifts), then synthesizes an ordered clip timeline that assigns source
//! media to slots bounded by those events while avoiding footage reuse.
//!
//! ## Features
//!
//! - **Onset/Beat Detection**: Energy-flux detection with per-algorithm
//!   tuning and band isolation for instrument tracking
//! - **Structural Detection**: Silence gaps, downbeats, phrases, intensity
//!   changes, harmonic shifts
//! - **Tempo Estimation**: Outlier-robust median-interval BPM
//! - **Timeline Synthesis**: Beat-locked, metronome and legacy scheduling
//!   with seeded, reproducible randomness
//!
//! ## Quick Start
//!
//! ```no_run
//! use beatcut::{analyze_audio, generate_timeline, MediaItem, SyncSettings};
//!
//! // Decoded mono samples (from an external decoding service)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let settings = SyncSettings::default();
//!
//! let analysis = analyze_audio(&samples, 44100, &settings)?;
//!
//! let media = vec![MediaItem::video(1, "clip.mp4", 30.0)];
//! let timeline = generate_timeline(&media, &analysis, &settings);
//!
//! println!("{} clips at {:.0} BPM", timeline.len(), analysis.bpm);
//! # Ok::<(), beatcut::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline follows this flow:
//!
//! ```text
//! PCM Buffer → Band Isolation (optional) → Detector → Beats + BPM
//!           → Cut-Point Scheduler (+ media, settings) → TimelineClip[]
//! ```
//!
//! Analysis is a pure function of the buffer and settings; callers memoize
//! results by [`SyncSettings::fingerprint`] and discard stale ones by
//! comparing against [`AnalysisResult::is_fresh`]. Decoding, rendering,
//! playback and persistence all live outside this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod timeline;

// Re-export main types
pub use analysis::{analyze, AnalysisResult};
pub use config::{Algorithm, CropMode, RhythmSegment, SyncSettings, VideoMode};
pub use error::EngineError;
pub use io::sample_buffer::SampleBuffer;
pub use timeline::{generate_timeline, MediaItem, MediaKind, TimelineClip};

/// Analyze decoded audio samples under the given settings
///
/// Convenience wrapper that builds the [`SampleBuffer`] and runs
/// [`analyze`].
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `settings` - Sync settings selecting the detector and its tuning
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` for a zero sample rate. Audio that
/// is merely too short or silent yields an empty beat list, not an error.
pub fn analyze_audio(
    samples: &[f32],
    sample_rate: u32,
    settings: &SyncSettings,
) -> Result<AnalysisResult, EngineError> {
    let buffer = SampleBuffer::new(samples.to_vec(), sample_rate)?;
    Ok(analyze(&buffer, settings))
}
