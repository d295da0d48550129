//! Analysis dispatch
//!
//! Routes a sample buffer through the detector selected by the sync
//! settings: instrument algorithms get band isolation plus onset detection,
//! generic selections run the balanced onset profile unfiltered, and the
//! structural algorithms run their dedicated detectors.

pub mod result;

pub use result::AnalysisResult;

use crate::config::{Algorithm, SyncSettings};
use crate::features::onset::{detect_onsets, DetectionParams};
use crate::features::structure;
use crate::features::tempo::estimate_bpm;
use crate::io::sample_buffer::SampleBuffer;
use crate::preprocessing::band_filter::{isolate_band, BandFilter};

/// Analyze a track under the given settings
///
/// Pure function over its inputs: no caching lives here. Callers memoize
/// the result keyed by [`SyncSettings::fingerprint`] and re-run wholesale
/// when settings change.
///
/// # Arguments
///
/// * `buffer` - Decoded mono track
/// * `settings` - Sync settings; `algorithm` selects the detector path and
///   `beat_sensitivity_ms` tunes debounce
///
/// # Returns
///
/// Detected event timestamps (clamped to the track duration), the tempo
/// estimate derived from them, and the settings fingerprint. A track too
/// short for the selected analysis yields an empty beat list and 0 BPM,
/// never an error.
pub fn analyze(buffer: &SampleBuffer, settings: &SyncSettings) -> AnalysisResult {
    let duration = buffer.duration_seconds();
    let sensitivity = settings.beat_sensitivity_ms;

    log::debug!(
        "Analyzing {:.2}s of audio with {:?}",
        duration,
        settings.algorithm
    );

    let mut beats = match settings.algorithm {
        Algorithm::Silence => structure::detect_silence_gaps(buffer, sensitivity),
        Algorithm::Downbeats => structure::estimate_downbeats(buffer, sensitivity),
        Algorithm::Phrases => structure::estimate_phrases(buffer, sensitivity),
        Algorithm::Intensity => structure::detect_intensity_changes(buffer, sensitivity),
        Algorithm::Harmonic => structure::detect_harmonic_changes(buffer, sensitivity),
        algorithm => {
            let params = DetectionParams::for_algorithm(algorithm);
            let filtered = BandFilter::for_algorithm(algorithm).and_then(|filter| {
                match isolate_band(buffer, filter) {
                    Ok(rendered) => Some(rendered),
                    Err(e) => {
                        log::warn!("Band isolation failed, using unfiltered signal: {}", e);
                        None
                    }
                }
            });
            let input = filtered.as_ref().unwrap_or(buffer);
            detect_onsets(input, &params, sensitivity)
        }
    };

    beats.retain(|&t| t >= 0.0 && t <= duration);

    let bpm = estimate_bpm(&beats);

    log::debug!("Analysis found {} events, {:.0} BPM", beats.len(), bpm);

    AnalysisResult {
        beats,
        bpm,
        duration_seconds: duration,
        fingerprint: settings.fingerprint(),
    }
}
