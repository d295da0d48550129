//! Phrase estimation
//!
//! Approximates musical phrases by sampling the downbeat stream: every 4th
//! downbeat at tight sensitivities, every 8th at loose ones.

use crate::features::structure::downbeat::estimate_downbeats;
use crate::io::sample_buffer::SampleBuffer;

/// Sensitivity boundary (ms) between 4-bar and 8-bar phrase sampling
const WIDE_PHRASE_SENSITIVITY_MS: u32 = 500;

/// Estimate phrase-boundary timestamps
///
/// # Arguments
///
/// * `buffer` - Unfiltered mono signal
/// * `sensitivity_ms` - User debounce; also selects the phrase stride
///   (≤ 500 ms → every 4th downbeat, otherwise every 8th)
pub fn estimate_phrases(buffer: &SampleBuffer, sensitivity_ms: u32) -> Vec<f32> {
    let downbeats = estimate_downbeats(buffer, sensitivity_ms);
    let stride: usize = if sensitivity_ms <= WIDE_PHRASE_SENSITIVITY_MS {
        4
    } else {
        8
    };

    log::debug!(
        "Phrase sampling: {} downbeats, stride {}",
        downbeats.len(),
        stride
    );

    downbeats.iter().step_by(stride).copied().collect()
}
