//! Energy-flux onset detection
//!
//! Detects onsets by finding peaks in the frame-by-frame energy derivative.
//!
//! Algorithm:
//! 1. Divide audio into overlapping frames (frame_size, hop_size)
//! 2. Compute RMS energy per frame
//! 3. Compute the positive flux: flux[n] = max(0, E[n] - E[n-1]), flux[0] = 0
//! 4. Threshold each frame against `multiplier` times the mean of the
//!    previous `window_size` flux values
//! 5. Keep strict local maxima above the absolute noise floor
//! 6. Convert frame indices to seconds, compensating the window centroid lag
//! 7. Debounce: drop candidates closer than the effective interval to the
//!    previously accepted onset

use crate::features::onset::params::DetectionParams;
use crate::io::sample_buffer::SampleBuffer;

/// Detect onsets in a mono buffer
///
/// # Arguments
///
/// * `buffer` - Mono signal (band-filtered or raw)
/// * `params` - Per-algorithm tuning from [`DetectionParams::for_algorithm`]
/// * `sensitivity_ms` - User debounce override in milliseconds; 0 keeps a
///   minimal 10 ms floor
///
/// # Returns
///
/// Strictly increasing onset times in seconds. Every adjacent gap is at
/// least the effective debounce interval. Input shorter than one local
/// threshold window produces an empty result rather than an error.
pub fn detect_onsets(
    buffer: &SampleBuffer,
    params: &DetectionParams,
    sensitivity_ms: u32,
) -> Vec<f32> {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate() as f32;

    log::debug!(
        "Detecting onsets: {} samples, frame={}, hop={}, window={}, multiplier={:.2}",
        samples.len(),
        params.frame_size,
        params.hop_size,
        params.window_size,
        params.multiplier
    );

    if samples.len() < params.frame_size {
        return Vec::new();
    }

    // Step 1-2: RMS energy per hop
    let num_frames = (samples.len() - params.frame_size) / params.hop_size + 1;
    let mut energies = Vec::with_capacity(num_frames);
    for i in 0..num_frames {
        let start = i * params.hop_size;
        let end = start + params.frame_size;
        let sum_sq: f32 = samples[start..end].iter().map(|&x| x * x).sum();
        energies.push((sum_sq / params.frame_size as f32).sqrt());
    }

    // Step 3: positive flux; only energy increases count as candidates
    let mut flux = Vec::with_capacity(num_frames);
    flux.push(0.0f32);
    for i in 1..energies.len() {
        flux.push((energies[i] - energies[i - 1]).max(0.0));
    }

    if flux.len() < params.window_size {
        return Vec::new();
    }

    let debounce = effective_debounce(sensitivity_ms, params.min_interval);
    let centroid_lag = (params.frame_size / 2) as f32 / sample_rate;

    // Step 4-7: adaptive threshold, strict local maximum, noise floor,
    // centroid compensation, debounce
    let mut onsets: Vec<f32> = Vec::new();
    for i in params.window_size..flux.len().saturating_sub(1) {
        let local_avg: f32 =
            flux[i - params.window_size..i].iter().sum::<f32>() / params.window_size as f32;

        let is_peak = flux[i] > local_avg * params.multiplier
            && flux[i] > flux[i - 1]
            && flux[i] > flux[i + 1]
            && flux[i] > params.noise_floor;

        if !is_peak {
            continue;
        }

        let timestamp =
            (i as f32 * params.hop_size as f32 / sample_rate - centroid_lag).max(0.0);

        if let Some(&last) = onsets.last() {
            if timestamp - last < debounce {
                continue;
            }
        }
        onsets.push(timestamp);
    }

    log::debug!("Energy flux detected {} onsets", onsets.len());

    onsets
}

/// Effective debounce interval in seconds
///
/// A sensitivity of 0 means "off" but still keeps a 10 ms floor so frame
/// overlap cannot produce duplicate detections of one event. The
/// per-algorithm `min_interval` acts as a lower bound in either case.
pub fn effective_debounce(sensitivity_ms: u32, min_interval: f32) -> f32 {
    let user = if sensitivity_ms == 0 {
        0.01
    } else {
        sensitivity_ms as f32 / 1000.0
    };
    user.max(min_interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Generate a 4-on-floor kick pattern at the given BPM
    fn generate_kick_pattern(
        duration_seconds: f32,
        bpm: f32,
        sample_rate: f32,
        kick_duration_ms: f32,
    ) -> Vec<f32> {
        let num_samples = (duration_seconds * sample_rate) as usize;
        let mut samples = vec![0.0f32; num_samples];

        let beat_interval = (60.0 / bpm * sample_rate) as usize;
        let kick_samples = (kick_duration_ms / 1000.0 * sample_rate) as usize;

        let mut pos = 0;
        while pos < num_samples {
            let end = (pos + kick_samples).min(num_samples);
            for (i, sample) in samples[pos..end].iter_mut().enumerate() {
                let t = i as f32 / kick_samples as f32;
                *sample = (-t * 5.0).exp() * 0.8;
            }
            pos += beat_interval;
        }

        samples
    }

    fn buffer(samples: Vec<f32>) -> SampleBuffer {
        SampleBuffer::new(samples, 44100).unwrap()
    }

    #[test]
    fn test_silent_buffer_produces_no_onsets() {
        let silent = buffer(vec![0.0f32; 44100 * 2]);
        let onsets = detect_onsets(&silent, &DetectionParams::balanced(), 0);
        assert!(onsets.is_empty(), "Silence must not produce onsets");
    }

    #[test]
    fn test_too_short_input_is_empty_not_error() {
        let short = buffer(vec![0.5f32; 1000]);
        let onsets = detect_onsets(&short, &DetectionParams::balanced(), 0);
        assert!(onsets.is_empty());
    }

    #[test]
    fn test_kick_pattern_onsets_near_beats() {
        let samples = generate_kick_pattern(4.0, 120.0, 44100.0, 80.0);
        let params = DetectionParams::for_algorithm(crate::config::Algorithm::Drums);
        let onsets = detect_onsets(&buffer(samples), &params, 0);

        assert!(
            onsets.len() >= 5 && onsets.len() <= 10,
            "Expected roughly 8 onsets for 4s of 120 BPM kicks, got {}",
            onsets.len()
        );

        // Each onset should land within 60 ms of some multiple of 0.5 s
        for &t in &onsets {
            let nearest_beat = (t / 0.5).round() * 0.5;
            assert!(
                (t - nearest_beat).abs() < 0.06,
                "Onset at {:.3}s too far from the beat grid",
                t
            );
        }
    }

    #[test]
    fn test_output_strictly_increasing_with_debounce_gaps() {
        let samples = generate_kick_pattern(8.0, 150.0, 44100.0, 60.0);
        let params = DetectionParams::for_algorithm(crate::config::Algorithm::Drums);
        let sensitivity_ms = 200;
        let onsets = detect_onsets(&buffer(samples), &params, sensitivity_ms);
        let min_gap = effective_debounce(sensitivity_ms, params.min_interval);

        for pair in onsets.windows(2) {
            assert!(pair[1] > pair[0], "Timestamps must strictly increase");
            assert!(
                pair[1] - pair[0] >= min_gap - 1e-6,
                "Gap {:.3}s below debounce {:.3}s",
                pair[1] - pair[0],
                min_gap
            );
        }
    }

    #[test]
    fn test_timestamps_never_negative() {
        // A burst right at the start exercises the centroid-lag clamp
        let mut samples = vec![0.0f32; 44100];
        for sample in samples.iter_mut().take(2000) {
            *sample = 0.8;
        }
        let onsets = detect_onsets(&buffer(samples), &DetectionParams::balanced(), 0);
        for &t in &onsets {
            assert!(t >= 0.0);
        }
    }

    #[test]
    fn test_effective_debounce_floor() {
        assert!((effective_debounce(0, 0.0) - 0.01).abs() < 1e-6);
        assert!((effective_debounce(500, 0.0) - 0.5).abs() < 1e-6);
        // Per-algorithm floor wins over a smaller user value
        assert!((effective_debounce(50, 0.12) - 0.12).abs() < 1e-6);
    }
}
