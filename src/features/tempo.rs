//! Tempo estimation
//!
//! Derives a single BPM figure from a beat timestamp sequence. The median
//! of the plausible inter-beat intervals is used rather than the mean; a
//! handful of missed or doubled beats should not drag the estimate.

/// Plausible inter-beat interval range in seconds (exclusive bounds)
const MIN_INTERVAL: f32 = 0.2;
const MAX_INTERVAL: f32 = 2.0;

/// BPM clamp range
const MIN_BPM: f32 = 40.0;
const MAX_BPM: f32 = 300.0;

/// Estimate BPM from beat timestamps
///
/// # Arguments
///
/// * `beats` - Beat times in seconds, sorted ascending
///
/// # Returns
///
/// Rounded BPM clamped to [40, 300], or 0.0 when fewer than 2 beats exist
/// or no interval falls inside (0.2 s, 2.0 s).
pub fn estimate_bpm(beats: &[f32]) -> f32 {
    if beats.len() < 2 {
        return 0.0;
    }

    let mut intervals: Vec<f32> = beats
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&dt| dt > MIN_INTERVAL && dt < MAX_INTERVAL)
        .collect();

    if intervals.is_empty() {
        log::debug!("No inter-beat interval in ({}, {})s", MIN_INTERVAL, MAX_INTERVAL);
        return 0.0;
    }

    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let median = if intervals.len() % 2 == 0 {
        (intervals[intervals.len() / 2 - 1] + intervals[intervals.len() / 2]) * 0.5
    } else {
        intervals[intervals.len() / 2]
    };

    (60.0 / median).round().clamp(MIN_BPM, MAX_BPM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_single_beat() {
        assert_eq!(estimate_bpm(&[]), 0.0);
        assert_eq!(estimate_bpm(&[1.0]), 0.0);
    }

    #[test]
    fn test_constant_spacing() {
        // 0.5s spacing = 120 BPM
        let beats: Vec<f32> = (0..16).map(|i| i as f32 * 0.5).collect();
        assert_eq!(estimate_bpm(&beats), 120.0);

        // 0.4s spacing = 150 BPM
        let beats: Vec<f32> = (0..16).map(|i| i as f32 * 0.4).collect();
        assert_eq!(estimate_bpm(&beats), 150.0);
    }

    #[test]
    fn test_outlier_intervals_discarded() {
        // Regular 0.5s beats with one 5s dropout in the middle
        let beats = vec![0.0, 0.5, 1.0, 1.5, 6.5, 7.0, 7.5, 8.0];
        assert_eq!(estimate_bpm(&beats), 120.0);
    }

    #[test]
    fn test_all_intervals_implausible() {
        // 0.05s spacing: everything below the 0.2s floor
        let beats: Vec<f32> = (0..10).map(|i| i as f32 * 0.05).collect();
        assert_eq!(estimate_bpm(&beats), 0.0);
    }

    #[test]
    fn test_clamped_to_range() {
        // 0.21s spacing -> ~286 BPM, within range
        let beats: Vec<f32> = (0..10).map(|i| i as f32 * 0.21).collect();
        let bpm = estimate_bpm(&beats);
        assert!((MIN_BPM..=MAX_BPM).contains(&bpm));

        // 1.9s spacing -> ~32 BPM, clamps up to 40
        let beats: Vec<f32> = (0..10).map(|i| i as f32 * 1.9).collect();
        assert_eq!(estimate_bpm(&beats), 40.0);
    }

    #[test]
    fn test_median_resists_mean_bias() {
        // Mostly 0.5s with a few 1.9s stragglers; mean would undershoot
        let mut beats = vec![0.0f32];
        for i in 0..10 {
            beats.push(beats[i] + 0.5);
        }
        beats.push(beats[10] + 1.9);
        beats.push(beats[11] + 1.9);
        assert_eq!(estimate_bpm(&beats), 120.0);
    }
}
