//! Downbeat estimation
//!
//! Approximates bar starts from the percussive beat stream. The median
//! inter-beat interval times four stands in for a 4/4 bar; beats spaced at
//! least 80% of that bar apart are kept as downbeats.

use crate::config::Algorithm;
use crate::features::onset::{detect_onsets, DetectionParams};
use crate::io::sample_buffer::SampleBuffer;

/// Fraction of the estimated bar length a beat must clear to be accepted
const BAR_ACCEPT_RATIO: f32 = 0.8;

/// Estimate downbeat timestamps
///
/// Runs the onset detector with the drums profile, then walks the beat list
/// keeping beats spaced roughly one bar apart.
///
/// # Arguments
///
/// * `buffer` - Unfiltered mono signal
/// * `sensitivity_ms` - User debounce passed through to beat detection
///
/// # Returns
///
/// Downbeat timestamps in seconds. Fewer than 4 detected beats come back
/// unchanged; there is not enough rhythm to infer a bar length from.
pub fn estimate_downbeats(buffer: &SampleBuffer, sensitivity_ms: u32) -> Vec<f32> {
    let params = DetectionParams::for_algorithm(Algorithm::Drums);
    let beats = detect_onsets(buffer, &params, sensitivity_ms);
    downbeats_from_beats(&beats)
}

/// Reduce a beat list to estimated downbeats
pub fn downbeats_from_beats(beats: &[f32]) -> Vec<f32> {
    if beats.len() < 4 {
        return beats.to_vec();
    }

    let mut intervals: Vec<f32> = beats.windows(2).map(|w| w[1] - w[0]).collect();
    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let median_interval = if intervals.len() % 2 == 0 {
        (intervals[intervals.len() / 2 - 1] + intervals[intervals.len() / 2]) * 0.5
    } else {
        intervals[intervals.len() / 2]
    };

    let bar_length = median_interval * 4.0;

    log::debug!(
        "Downbeat walk: {} beats, median interval {:.3}s, bar {:.3}s",
        beats.len(),
        median_interval,
        bar_length
    );

    let mut downbeats = vec![beats[0]];
    for &beat in &beats[1..] {
        let last = *downbeats.last().expect("seeded with the first beat");
        if beat - last >= bar_length * BAR_ACCEPT_RATIO {
            downbeats.push(beat);
        }
    }

    downbeats
}
