//! Timeline and media data model

use serde::{Deserialize, Serialize};

/// Virtual source duration assigned to still images
pub const IMAGE_VIRTUAL_DURATION: f32 = 5.0;

/// Kind of source media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// Moving footage with a finite duration
    Video,
    /// Still image; its source "window" is the whole image
    Image,
}

/// One source media item, as reported by the external ingestion service
///
/// Read-only input to the scheduler and allocator; this crate never touches
/// file bytes or thumbnails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    /// Stable identifier assigned by the ingestion layer
    pub id: u64,

    /// Video or image
    pub kind: MediaKind,

    /// Source duration in seconds; images carry a virtual default
    pub duration: f32,

    /// Display name
    pub name: String,
}

impl MediaItem {
    /// Video item with a known duration
    pub fn video(id: u64, name: impl Into<String>, duration: f32) -> Self {
        Self {
            id,
            kind: MediaKind::Video,
            duration,
            name: name.into(),
        }
    }

    /// Still image with the virtual default duration
    pub fn image(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: MediaKind::Image,
            duration: IMAGE_VIRTUAL_DURATION,
            name: name.into(),
        }
    }
}

/// One slot of the generated edit
///
/// Invariant: `timeline_end - timeline_start == source_end - source_start
/// == duration() > 0`. Consecutive clips from one generation call are
/// contiguous and together cover `[0, total_duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineClip {
    /// Source media item
    pub media_id: u64,

    /// Slot start on the output timeline, seconds
    pub timeline_start: f32,

    /// Slot end on the output timeline, seconds
    pub timeline_end: f32,

    /// Content start inside the source item, seconds
    pub source_start: f32,

    /// Content end inside the source item, seconds
    pub source_end: f32,
}

impl TimelineClip {
    /// Clip length in seconds
    pub fn duration(&self) -> f32 {
        self.timeline_end - self.timeline_start
    }
}
