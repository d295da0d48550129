//! Silence-gap detection
//!
//! Emits the moment sound *resumes* after a sufficiently long quiet span.
//! Cutting on re-entries after dropouts tends to read better than cutting
//! on the dropout itself.

use crate::io::sample_buffer::SampleBuffer;

/// RMS analysis window in samples
const FRAME_SIZE: usize = 1024;

/// Step between windows in samples
const HOP_SIZE: usize = 512;

/// RMS level below which a window counts as silent
const SILENCE_THRESHOLD: f32 = 0.02;

/// Minimum silent span, in seconds, for the resume point to count
const MIN_GAP_SECONDS: f32 = 0.3;

/// Detect points where sound resumes after a silence gap
///
/// # Arguments
///
/// * `buffer` - Unfiltered mono signal
/// * `sensitivity_ms` - User debounce; 0 keeps the minimal 10 ms floor
///
/// # Returns
///
/// Strictly increasing resume timestamps in seconds. A track with no gaps
/// of at least 0.3 s produces an empty result.
pub fn detect_silence_gaps(buffer: &SampleBuffer, sensitivity_ms: u32) -> Vec<f32> {
    let samples = buffer.samples();
    let sample_rate = buffer.sample_rate() as f32;

    if samples.len() < FRAME_SIZE {
        return Vec::new();
    }

    log::debug!(
        "Detecting silence gaps: {} samples, threshold={}",
        samples.len(),
        SILENCE_THRESHOLD
    );

    let debounce = if sensitivity_ms == 0 {
        0.01
    } else {
        sensitivity_ms as f32 / 1000.0
    };

    let num_frames = (samples.len() - FRAME_SIZE) / HOP_SIZE + 1;
    let mut resumes: Vec<f32> = Vec::new();
    let mut silence_started: Option<f32> = None;

    for i in 0..num_frames {
        let start = i * HOP_SIZE;
        let end = start + FRAME_SIZE;
        let sum_sq: f32 = samples[start..end].iter().map(|&x| x * x).sum();
        let rms = (sum_sq / FRAME_SIZE as f32).sqrt();
        let timestamp = start as f32 / sample_rate;

        if rms < SILENCE_THRESHOLD {
            if silence_started.is_none() {
                silence_started = Some(timestamp);
            }
        } else if let Some(gap_start) = silence_started.take() {
            if timestamp - gap_start >= MIN_GAP_SECONDS {
                let accepted = match resumes.last() {
                    Some(&last) => timestamp - last >= debounce,
                    None => true,
                };
                if accepted {
                    resumes.push(timestamp);
                }
            }
        }
    }

    log::debug!("Detected {} silence-gap resume points", resumes.len());

    resumes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(samples: Vec<f32>) -> SampleBuffer {
        SampleBuffer::new(samples, 44100).unwrap()
    }

    /// Loud / silent / loud, with a configurable gap length
    fn gapped_signal(gap_seconds: f32) -> Vec<f32> {
        let sr = 44100.0;
        let mut samples = vec![0.5f32; (1.0 * sr) as usize];
        samples.extend(vec![0.0f32; (gap_seconds * sr) as usize]);
        samples.extend(vec![0.5f32; (1.0 * sr) as usize]);
        samples
    }

    #[test]
    fn test_resume_after_long_gap() {
        let resumes = detect_silence_gaps(&buffer(gapped_signal(0.5)), 0);
        assert_eq!(resumes.len(), 1, "One gap, one resume point");
        // Gap spans [1.0, 1.5]; resume should land near 1.5
        assert!(
            (resumes[0] - 1.5).abs() < 0.05,
            "Resume at {:.3}s, expected ~1.5s",
            resumes[0]
        );
    }

    #[test]
    fn test_short_gap_ignored() {
        let resumes = detect_silence_gaps(&buffer(gapped_signal(0.1)), 0);
        assert!(resumes.is_empty(), "Gaps under 0.3s must not emit events");
    }

    #[test]
    fn test_continuous_audio_has_no_gaps() {
        let resumes = detect_silence_gaps(&buffer(vec![0.5f32; 44100 * 3]), 0);
        assert!(resumes.is_empty());
    }

    #[test]
    fn test_all_silence_has_no_resume() {
        let resumes = detect_silence_gaps(&buffer(vec![0.0f32; 44100 * 3]), 0);
        assert!(resumes.is_empty(), "Silence that never ends never resumes");
    }
}
