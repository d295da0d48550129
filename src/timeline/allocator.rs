//! Source segment allocation
//!
//! Picks where inside a media item each clip's content starts, tracking
//! previously used source ranges so footage is not repeated until the item
//! is exhausted. Selection prefers longer free spans (probability
//! proportional to span length) and the final in-span offset follows the
//! crop mode.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::CropMode;

/// Margin reserved at both ends of a media item, as a fraction of duration
const EDGE_MARGIN_FRACTION: f32 = 0.05;

/// Gap below which two interval boundaries count as touching
const ADJACENCY_TOLERANCE: f32 = 0.01;

/// Golden-section fraction used by [`CropMode::Golden`]
const GOLDEN_FRACTION: f32 = 0.382;

/// Outcome of one allocation attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Allocation {
    /// Clip content starts at this source offset, in seconds
    Offset(f32),
    /// No free interval can hold the clip; the caller clears the item's
    /// used-range history and retries
    Saturated,
}

/// Attempt to place a clip inside a media item
///
/// # Arguments
///
/// * `media_duration` - Source item length in seconds
/// * `clip_duration` - Requested clip length in seconds
/// * `crop_mode` - In-interval placement policy
/// * `used` - Previously allocated `[start, end)` ranges for this item;
///   the chosen range is recorded here before returning
/// * `rng` - Scheduler-owned seeded generator
///
/// # Returns
///
/// `Allocation::Offset` on success, `Allocation::Saturated` when no free
/// interval is long enough.
pub fn allocate(
    media_duration: f32,
    clip_duration: f32,
    crop_mode: CropMode,
    used: &mut Vec<(f32, f32)>,
    rng: &mut StdRng,
) -> Allocation {
    let margin = media_duration * EDGE_MARGIN_FRACTION;
    let span = (margin, media_duration - margin);

    // Item too short for margins: center when possible, else offset 0.
    if span.1 - span.0 < clip_duration {
        let offset = if media_duration >= clip_duration {
            (media_duration - clip_duration) / 2.0
        } else {
            0.0
        };
        used.push((offset, offset + clip_duration));
        return Allocation::Offset(offset);
    }

    let free = subtract_used(span, used);
    let eligible: Vec<(f32, f32)> = free
        .into_iter()
        .filter(|(start, end)| end - start >= clip_duration)
        .collect();

    if eligible.is_empty() {
        return Allocation::Saturated;
    }

    // Weight by interval length so long untouched spans win more often
    let total_length: f32 = eligible.iter().map(|(s, e)| e - s).sum();
    let mut draw = rng.gen_range(0.0..total_length);
    let mut chosen = eligible[eligible.len() - 1];
    for &(start, end) in &eligible {
        let length = end - start;
        if draw < length {
            chosen = (start, end);
            break;
        }
        draw -= length;
    }

    let slack = (chosen.1 - chosen.0) - clip_duration;
    let offset = chosen.0
        + match crop_mode {
            CropMode::Center => slack / 2.0,
            CropMode::Start => 0.0,
            CropMode::End => slack,
            CropMode::Golden => slack * GOLDEN_FRACTION,
            CropMode::Random => {
                if slack > 0.0 {
                    rng.gen_range(0.0..slack)
                } else {
                    0.0
                }
            }
            CropMode::Smart => {
                // Mean of two uniform draws leans toward the middle
                // without true Gaussian sampling
                let (a, b): (f32, f32) = (rng.gen(), rng.gen());
                slack * (a + b) / 2.0
            }
        };

    used.push((offset, offset + clip_duration));
    Allocation::Offset(offset)
}

/// Place a clip, clearing the item's history once on saturation
///
/// Implements the caller-side saturation protocol: on `Saturated`, clear
/// the used-range history and retry once; if even an empty history cannot
/// place the clip, fall back to offset 0.
pub fn allocate_with_reset(
    media_duration: f32,
    clip_duration: f32,
    crop_mode: CropMode,
    used: &mut Vec<(f32, f32)>,
    rng: &mut StdRng,
) -> f32 {
    match allocate(media_duration, clip_duration, crop_mode, used, rng) {
        Allocation::Offset(offset) => offset,
        Allocation::Saturated => {
            log::debug!(
                "Media saturated ({} used ranges), clearing history",
                used.len()
            );
            used.clear();
            match allocate(media_duration, clip_duration, crop_mode, used, rng) {
                Allocation::Offset(offset) => offset,
                Allocation::Saturated => {
                    log::warn!(
                        "Allocation still saturated after reset, falling back to offset 0"
                    );
                    used.push((0.0, clip_duration));
                    0.0
                }
            }
        }
    }
}

/// Subtract used ranges from a span, merging near-touching boundaries
fn subtract_used(span: (f32, f32), used: &[(f32, f32)]) -> Vec<(f32, f32)> {
    let mut blocked: Vec<(f32, f32)> = used.to_vec();
    blocked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut merged: Vec<(f32, f32)> = Vec::with_capacity(blocked.len());
    for range in blocked {
        match merged.last_mut() {
            Some(last) if range.0 - last.1 <= ADJACENCY_TOLERANCE => {
                last.1 = last.1.max(range.1);
            }
            _ => merged.push(range),
        }
    }

    let mut free = Vec::new();
    let mut cursor = span.0;
    for (start, end) in merged {
        if end <= span.0 || start >= span.1 {
            continue;
        }
        if start - cursor > ADJACENCY_TOLERANCE {
            free.push((cursor, start.min(span.1)));
        }
        cursor = cursor.max(end);
        if cursor >= span.1 {
            return free;
        }
    }
    if span.1 - cursor > ADJACENCY_TOLERANCE {
        free.push((cursor, span.1));
    }
    free
}
