//! Intensity-change detection
//!
//! Flags build-ups and drops by comparing the energy just behind each point
//! against the energy just ahead of it, over half-second windows.

use crate::io::sample_buffer::SampleBuffer;

/// RMS window length in seconds
const WINDOW_SECONDS: f32 = 0.5;

/// Step between windows in seconds
const HOP_SECONDS: f32 = 0.1;

/// Number of preceding windows in the trailing mean
const TRAILING_WINDOWS: usize = 5;

/// Number of following windows in the leading mean
const LEADING_WINDOWS: usize = 3;

/// Base delta a change must exceed
const BASE_THRESHOLD: f32 = 0.1;

/// Sensitivity contribution to the threshold, per second of sensitivity
const SENSITIVITY_GAIN: f32 = 0.5;

/// Fixed spacing between accepted intensity changes, in seconds
const DEBOUNCE_SECONDS: f32 = 1.0;

/// Detect intensity-change timestamps
///
/// # Arguments
///
/// * `buffer` - Unfiltered mono signal
/// * `sensitivity_ms` - Raises the change threshold: threshold =
///   0.1 + sensitivity_seconds × 0.5
///
/// # Returns
///
/// Strictly increasing change timestamps, at least 1.0 s apart.
pub fn detect_intensity_changes(buffer: &SampleBuffer, sensitivity_ms: u32) -> Vec<f32> {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate() as f32;
    let window = (WINDOW_SECONDS * sample_rate) as usize;
    let hop = (HOP_SECONDS * sample_rate) as usize;

    if samples.len() < window || hop == 0 {
        return Vec::new();
    }

    let threshold = BASE_THRESHOLD + (sensitivity_ms as f32 / 1000.0) * SENSITIVITY_GAIN;

    log::debug!(
        "Detecting intensity changes: {} samples, threshold={:.3}",
        samples.len(),
        threshold
    );

    let num_windows = (samples.len() - window) / hop + 1;
    let mut energies = Vec::with_capacity(num_windows);
    for i in 0..num_windows {
        let start = i * hop;
        let sum_sq: f32 = samples[start..start + window].iter().map(|&x| x * x).sum();
        energies.push((sum_sq / window as f32).sqrt());
    }

    if energies.len() < TRAILING_WINDOWS + LEADING_WINDOWS {
        return Vec::new();
    }

    // Delta between the mean of what follows and the mean of what precedes
    let first = TRAILING_WINDOWS;
    let last = energies.len() - LEADING_WINDOWS;
    let mut deltas = Vec::with_capacity(last - first);
    for i in first..last {
        let trailing: f32 =
            energies[i - TRAILING_WINDOWS..i].iter().sum::<f32>() / TRAILING_WINDOWS as f32;
        let leading: f32 =
            energies[i..i + LEADING_WINDOWS].iter().sum::<f32>() / LEADING_WINDOWS as f32;
        deltas.push(leading - trailing);
    }

    let mut changes: Vec<f32> = Vec::new();
    for d in 1..deltas.len().saturating_sub(1) {
        let magnitude = deltas[d].abs();
        let is_change = magnitude > threshold
            && magnitude > deltas[d - 1].abs()
            && magnitude > deltas[d + 1].abs();

        if !is_change {
            continue;
        }

        let timestamp = (first + d) as f32 * HOP_SECONDS;
        if let Some(&prev) = changes.last() {
            if timestamp - prev < DEBOUNCE_SECONDS {
                continue;
            }
        }
        changes.push(timestamp);
    }

    log::debug!("Detected {} intensity changes", changes.len());

    changes
}
