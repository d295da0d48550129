//! Harmonic/tonal-shift detection
//!
//! Tracks coarse tonal movement without a spectral transform: each analysis
//! frame is split into three index-range energy bands standing in for
//! low/mid/high content, and an amplitude-weighted index centroid summarizes
//! where the frame's energy sits. A sustained shift of the centroid between
//! the trailing and leading neighborhoods of a frame is flagged as a
//! harmonic change.
//!
//! The index-range bands are a deliberate approximation, not frequency
//! bins; replacing them with a real spectral centroid would change
//! detection behavior.

use crate::io::sample_buffer::SampleBuffer;

/// Analysis frame length in samples
const FRAME_SIZE: usize = 4096;

/// Step between frames in samples
const HOP_SIZE: usize = 2048;

/// Band boundaries as fractions of the frame's index range
const BAND_EDGES: [(f32, f32); 3] = [(0.0, 0.1), (0.1, 0.4), (0.4, 0.8)];

/// Frames on each side of the comparison point
const NEIGHBORHOOD: usize = 5;

/// Relative centroid shift that counts as a change
const SHIFT_THRESHOLD: f32 = 0.15;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-6;

/// Per-frame tonal summary
#[derive(Debug, Clone, Copy)]
struct FrameProfile {
    /// Energy in each coarse band (low, mid, high)
    band_energy: [f32; 3],
    /// Amplitude-weighted index centroid over the banded region
    centroid: f32,
}

/// Detect harmonic-change timestamps
///
/// # Arguments
///
/// * `buffer` - Unfiltered mono signal
/// * `sensitivity_ms` - User debounce; 0 keeps the minimal 10 ms floor
///
/// # Returns
///
/// Strictly increasing change timestamps. Input shorter than one analysis
/// frame, or with too few frames for the neighborhood comparison, produces
/// an empty result.
pub fn detect_harmonic_changes(buffer: &SampleBuffer, sensitivity_ms: u32) -> Vec<f32> {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate() as f32;

    if samples.len() < FRAME_SIZE {
        return Vec::new();
    }

    log::debug!(
        "Detecting harmonic changes: {} samples, frame={}, hop={}",
        samples.len(),
        FRAME_SIZE,
        HOP_SIZE
    );

    let debounce = if sensitivity_ms == 0 {
        0.01
    } else {
        sensitivity_ms as f32 / 1000.0
    };

    let num_frames = (samples.len() - FRAME_SIZE) / HOP_SIZE + 1;
    let mut profiles: Vec<FrameProfile> = Vec::with_capacity(num_frames);
    let mut prev_centroid = 0.0f32;

    for i in 0..num_frames {
        let frame = &samples[i * HOP_SIZE..i * HOP_SIZE + FRAME_SIZE];
        let profile = frame_profile(frame, prev_centroid);
        prev_centroid = profile.centroid;
        profiles.push(profile);
    }

    if profiles.len() < NEIGHBORHOOD * 2 + 1 {
        return Vec::new();
    }

    let mut changes: Vec<f32> = Vec::new();
    for i in NEIGHBORHOOD..profiles.len() - NEIGHBORHOOD {
        // Never cut on a frame with no tonal content of its own
        let frame_energy: f32 = profiles[i].band_energy.iter().sum();
        if frame_energy < EPSILON {
            continue;
        }

        let trailing: f32 = profiles[i - NEIGHBORHOOD..i]
            .iter()
            .map(|p| p.centroid)
            .sum::<f32>()
            / NEIGHBORHOOD as f32;
        let leading: f32 = profiles[i..i + NEIGHBORHOOD]
            .iter()
            .map(|p| p.centroid)
            .sum::<f32>()
            / NEIGHBORHOOD as f32;

        if trailing < EPSILON {
            continue;
        }

        let relative_shift = (leading - trailing).abs() / trailing;
        if relative_shift <= SHIFT_THRESHOLD {
            continue;
        }

        let timestamp = (i * HOP_SIZE) as f32 / sample_rate;
        if let Some(&prev) = changes.last() {
            if timestamp - prev < debounce {
                continue;
            }
        }
        changes.push(timestamp);
    }

    log::debug!("Detected {} harmonic changes", changes.len());

    changes
}

/// Band energies and index centroid for one frame
///
/// Near-silent frames carry the previous centroid forward so a dropout in
/// the middle of a track does not register as a tonal shift.
fn frame_profile(frame: &[f32], prev_centroid: f32) -> FrameProfile {
    let mut band_energy = [0.0f32; 3];
    let mut weighted_sum = 0.0f32;
    let mut magnitude_sum = 0.0f32;

    for (band, &(lo, hi)) in BAND_EDGES.iter().enumerate() {
        let start = (lo * frame.len() as f32) as usize;
        let end = (hi * frame.len() as f32) as usize;
        for (offset, &sample) in frame[start..end].iter().enumerate() {
            let magnitude = sample.abs();
            band_energy[band] += sample * sample;
            weighted_sum += (start + offset) as f32 * magnitude;
            magnitude_sum += magnitude;
        }
    }

    let centroid = if magnitude_sum > EPSILON {
        weighted_sum / magnitude_sum
    } else {
        prev_centroid
    };

    FrameProfile {
        band_energy,
        centroid,
    }
}
