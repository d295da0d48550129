//! Rhythm-segment stride overrides
//!
//! Users can override the beat stride over time ranges of the track
//! ("cut every beat in the chorus, every 4th in the verse"). The overrides
//! are kept as a sorted interval list and queried by binary search.

use crate::config::RhythmSegment;

/// Sorted, validated view over a set of stride overrides
#[derive(Debug, Clone)]
pub struct RhythmTimeline {
    segments: Vec<RhythmSegment>,
}

impl RhythmTimeline {
    /// Build from user-supplied segments
    ///
    /// Segments with `end <= start` or a zero stride are dropped; the rest
    /// are sorted by start time. Overlapping segments resolve to the one
    /// starting latest at or before the query point.
    pub fn new(segments: &[RhythmSegment]) -> Self {
        let mut segments: Vec<RhythmSegment> = segments
            .iter()
            .copied()
            .filter(|s| s.end > s.start && s.skip_every_n > 0)
            .collect();
        segments.sort_by(|a, b| {
            a.start
                .partial_cmp(&b.start)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { segments }
    }

    /// Stride override active at timestamp `t`, if any
    pub fn stride_at(&self, t: f32) -> Option<u32> {
        if self.segments.is_empty() {
            return None;
        }
        // Index of the first segment starting strictly after t; the
        // candidate is the one just before it.
        let idx = self.segments.partition_point(|s| s.start <= t);
        if idx == 0 {
            return None;
        }
        let candidate = &self.segments[idx - 1];
        (t < candidate.end).then_some(candidate.skip_every_n)
    }

    /// True if no overrides survived validation
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
