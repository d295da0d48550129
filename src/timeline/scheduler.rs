//! Cut-point scheduling and clip assembly
//!
//! Produces the ordered cut-point sequence for a whole track under one of
//! four scheduling modes, then builds the clip list between consecutive
//! cuts, resolving each slot to a concrete source range through the
//! allocator.
//!
//! All randomness comes from one `StdRng` seeded from the settings, so a
//! fixed seed reproduces the full timeline.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::AnalysisResult;
use crate::config::{SyncSettings, VideoMode};
use crate::timeline::allocator::allocate_with_reset;
use crate::timeline::clip::{MediaItem, MediaKind, TimelineClip};
use crate::timeline::rhythm::RhythmTimeline;

/// Default grid tempo when neither manual nor detected BPM exists
const FALLBACK_BPM: f32 = 120.0;

/// Metronome grid snaps to the first beat when it starts this early
const GRID_SNAP_WINDOW: f32 = 0.5;

/// Floor for a jittered metronome interval, seconds
const MIN_GRID_INTERVAL: f32 = 0.1;

/// Legacy walker: candidates considered for non-instrument algorithms
const CANDIDATE_RANGE: usize = 4;

/// Legacy walker: extra headroom past max duration for instrument modes
const GRACE_SECONDS: f32 = 0.3;

/// Legacy walker: advance when no beats are usable
const NO_BEAT_ADVANCE: f32 = 2.0;

/// Legacy walker: forced advance when a step would stall
const STALL_ADVANCE: f32 = 0.5;

/// Steps shorter than this count as stalled
const MIN_STEP: f32 = 0.01;

/// Cut gaps below this are dropped as rounding noise
const MIN_CLIP_SECONDS: f32 = 0.05;

/// Generate the full clip timeline for a track
///
/// # Arguments
///
/// * `media` - Source media items, in user order
/// * `analysis` - Beats, tempo and duration from [`crate::analysis::analyze`]
/// * `settings` - Sync settings; `video_mode` picks the scheduling strategy
///
/// # Returns
///
/// Contiguous, non-overlapping clips covering `[0, duration]`. An empty
/// media list or an empty track yields an empty timeline. Used-range state
/// lives only inside this call; re-invoking with identical settings (and
/// seed) reproduces the same timeline.
pub fn generate_timeline(
    media: &[MediaItem],
    analysis: &AnalysisResult,
    settings: &SyncSettings,
) -> Vec<TimelineClip> {
    let total = analysis.duration_seconds;

    if media.is_empty() || total <= 0.0 {
        log::debug!("Nothing to schedule: {} media, {:.2}s", media.len(), total);
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(settings.seed);

    let cuts = match settings.video_mode {
        VideoMode::BeatLocked if !analysis.beats.is_empty() => {
            beat_locked_cut_points(&analysis.beats, total, settings, &mut rng)
        }
        VideoMode::Metronome => metronome_cut_points(analysis, total, settings, &mut rng),
        // Legacy walkers; BeatLocked lands here too when no beats exist,
        // since it cannot place a single cut without them.
        _ => legacy_cut_points(&analysis.beats, total, settings, &mut rng),
    };

    let cuts = drop_rounding_noise(cuts, total);

    log::debug!(
        "{:?} produced {} cut points over {:.2}s",
        settings.video_mode,
        cuts.len(),
        total
    );

    assemble_clips(&cuts, media, settings, &mut rng)
}

/// Beat-locked mode: stride along the detected beats
///
/// The walk is 1-based: advancing the cursor by `step` from the list start
/// lands on the `step`-th beat. Each landed beat becomes a cut when it
/// moves time forward and stays inside the track.
fn beat_locked_cut_points(
    beats: &[f32],
    total: f32,
    settings: &SyncSettings,
    rng: &mut StdRng,
) -> Vec<f32> {
    let overrides = RhythmTimeline::new(&settings.rhythm_segments);
    let variance = settings.variance_fraction();

    let mut cuts = vec![0.0f32];
    let mut cursor: i64 = -1;

    loop {
        let position = if cursor >= 0 { beats[cursor as usize] } else { 0.0 };
        let base = overrides
            .stride_at(position)
            .unwrap_or(settings.skip_every_n)
            .max(1) as i64;

        let mut step = base;
        if variance > 0.0 {
            let jitter = (base as f32 * variance * 2.0).floor() as i64;
            if jitter > 0 {
                step += rng.gen_range(-jitter..=jitter);
            }
        }
        step = step.max(1);

        cursor += step;
        if cursor as usize >= beats.len() {
            break;
        }

        let beat = beats[cursor as usize];
        let last = *cuts.last().expect("seeded with 0.0");
        if beat > last && beat <= total {
            cuts.push(beat);
        }
    }

    finish_at_total(cuts, total)
}

/// Metronome mode: uniform BPM grid, beats only anchor the first point
fn metronome_cut_points(
    analysis: &AnalysisResult,
    total: f32,
    settings: &SyncSettings,
    rng: &mut StdRng,
) -> Vec<f32> {
    let bpm = settings
        .manual_bpm
        .filter(|&b| b > 0.0)
        .unwrap_or(if analysis.bpm > 0.0 {
            analysis.bpm
        } else {
            FALLBACK_BPM
        });

    let base_interval = 60.0 / bpm * settings.skip_every_n.max(1) as f32;
    let variance = settings.variance_fraction();

    let mut cuts = vec![0.0f32];

    // An almost-immediate first beat pulls the grid onto the music
    let mut current = match analysis.beats.first() {
        Some(&first) if first > 0.0 && first < GRID_SNAP_WINDOW => first,
        _ => 0.0,
    };
    if current > 0.0 && current < total {
        cuts.push(current);
    }

    loop {
        let mut interval = base_interval;
        if variance > 0.0 {
            interval += base_interval * rng.gen_range(-variance..=variance);
        }
        interval = interval.max(MIN_GRID_INTERVAL);

        let next = current + interval;
        if next > total {
            break;
        }
        cuts.push(next);
        current = next;
    }

    finish_at_total(cuts, total)
}

/// Legacy walker shared by sequential-once and random-loop modes
///
/// The order of checks here is deliberate and load-bearing; resist
/// "simplifying" the fallback chain.
fn legacy_cut_points(
    beats: &[f32],
    total: f32,
    settings: &SyncSettings,
    rng: &mut StdRng,
) -> Vec<f32> {
    let tight = settings.algorithm.is_tight_tracking();

    let mut cuts = vec![0.0f32];
    let mut current = 0.0f32;

    while current < total {
        let window_start = current + settings.min_duration;
        let valid: Vec<f32> = beats
            .iter()
            .copied()
            .filter(|&b| b > window_start)
            .collect();

        let mut next = if valid.is_empty() {
            current + NO_BEAT_ADVANCE
        } else {
            let range = if tight { 1 } else { CANDIDATE_RANGE };
            let candidate = valid[rng.gen_range(0..valid.len().min(range))];

            if candidate - current > settings.max_duration {
                if tight && candidate - current <= settings.max_duration + GRACE_SECONDS {
                    candidate
                } else {
                    beats
                        .iter()
                        .copied()
                        .filter(|&b| b > current && b <= current + settings.max_duration)
                        .last()
                        .unwrap_or(current + settings.max_duration)
                }
            } else {
                candidate
            }
        };

        if next - current < MIN_STEP {
            next = current + STALL_ADVANCE;
        }
        if next >= total {
            break;
        }
        cuts.push(next);
        current = next;
    }

    finish_at_total(cuts, total)
}

/// Append the track end as the final cut when not already reached
fn finish_at_total(mut cuts: Vec<f32>, total: f32) -> Vec<f32> {
    match cuts.last() {
        Some(&last) if (total - last).abs() <= f32::EPSILON * total.max(1.0) => {}
        _ => cuts.push(total),
    }
    cuts
}

/// Drop cut points that leave sub-threshold slivers, keeping coverage
///
/// The final point always remains the track end; a sliver just before it
/// merges backwards into the preceding clip.
fn drop_rounding_noise(cuts: Vec<f32>, total: f32) -> Vec<f32> {
    let mut kept = vec![0.0f32];
    for &cut in cuts.iter().skip(1) {
        let last = *kept.last().expect("seeded with 0.0");
        if cut - last >= MIN_CLIP_SECONDS {
            kept.push(cut);
        }
    }
    let kept_len = kept.len();
    if let Some(last) = kept.last_mut() {
        // Ensure exact end coverage even when the last accepted cut fell
        // within the noise threshold of the track end
        if (total - *last).abs() < MIN_CLIP_SECONDS && kept_len > 1 {
            *last = total;
        }
    }
    if *kept.last().expect("non-empty") < total {
        kept.push(total);
    }
    kept
}

/// Build clips between consecutive cuts and resolve their source ranges
fn assemble_clips(
    cuts: &[f32],
    media: &[MediaItem],
    settings: &SyncSettings,
    rng: &mut StdRng,
) -> Vec<TimelineClip> {
    let mut clips = Vec::with_capacity(cuts.len().saturating_sub(1));
    let mut used_ranges: HashMap<u64, Vec<(f32, f32)>> = HashMap::new();
    let mut cursor = 0usize;
    let mut previous: Option<usize> = None;

    for window in cuts.windows(2) {
        let (start, end) = (window[0], window[1]);
        let duration = end - start;
        if duration <= 0.0 {
            continue;
        }

        let index = match settings.video_mode {
            VideoMode::BeatLocked | VideoMode::Metronome => {
                let index = cursor % media.len();
                cursor += 1;
                index
            }
            VideoMode::SequentialOnce => {
                if cursor >= media.len() {
                    log::debug!(
                        "Sequential media exhausted with {:.2}s of track remaining",
                        cuts.last().copied().unwrap_or(end) - start
                    );
                    break;
                }
                let index = cursor;
                cursor += 1;
                index
            }
            VideoMode::RandomLoop => {
                let mut index = rng.gen_range(0..media.len());
                if media.len() > 1 {
                    while Some(index) == previous {
                        index = rng.gen_range(0..media.len());
                    }
                }
                index
            }
        };

        let item = &media[index];
        let source_start = match item.kind {
            MediaKind::Image => 0.0,
            MediaKind::Video => {
                let used = used_ranges.entry(item.id).or_default();
                allocate_with_reset(item.duration, duration, settings.crop_mode, used, rng)
            }
        };

        clips.push(TimelineClip {
            media_id: item.id,
            timeline_start: start,
            timeline_end: end,
            source_start,
            source_end: source_start + duration,
        });
        previous = Some(index);
    }

    clips
}
