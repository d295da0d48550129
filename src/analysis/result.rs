//! Analysis result types

use serde::{Deserialize, Serialize};

/// Result of one analysis pass over a track
///
/// Produced fresh for every analysis request and replaced wholesale when
/// settings change. The `fingerprint` field records the settings the result
/// was computed under; callers compare it against the current settings'
/// fingerprint to discard stale results instead of interrupting a running
/// computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected event timestamps in seconds, strictly increasing,
    /// each within [0, duration_seconds]
    pub beats: Vec<f32>,

    /// Estimated tempo in BPM; 0.0 when no usable beat intervals exist
    pub bpm: f32,

    /// Track duration in seconds
    pub duration_seconds: f32,

    /// Fingerprint of the settings this result was computed under
    pub fingerprint: String,
}

impl AnalysisResult {
    /// True when the result matches the given settings fingerprint
    pub fn is_fresh(&self, fingerprint: &str) -> bool {
        self.fingerprint == fingerprint
    }
}
