//! Per-algorithm detection parameters
//!
//! Each analysis algorithm tunes the same energy-flux detector differently:
//! percussive modes use short frames and strong thresholds, sustained modes
//! use long frames and slow debounce. Unknown/generic selections fall back
//! to a balanced profile.

use crate::config::Algorithm;

/// Tuning for one run of the energy-flux onset detector
///
/// Invariants, checked by the table test below:
/// `hop_size <= frame_size`, `multiplier > 1.0`, `min_interval >= 0.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Analysis window length in samples
    pub frame_size: usize,

    /// Step between consecutive windows in samples
    pub hop_size: usize,

    /// Number of preceding flux frames in the local-average window
    pub window_size: usize,

    /// Threshold gain over the local average
    pub multiplier: f32,

    /// Absolute minimum flux for a peak to count
    pub noise_floor: f32,

    /// Debounce floor between accepted onsets, in seconds
    pub min_interval: f32,
}

impl DetectionParams {
    /// Balanced profile used for `Energy`, `Spectral`, and any selection
    /// without dedicated tuning
    pub fn balanced() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            window_size: 10,
            multiplier: 1.4,
            noise_floor: 0.005,
            min_interval: 0.15,
        }
    }

    /// Look up the tuning for an algorithm
    ///
    /// Structural algorithms run their own detectors but still resolve here
    /// when they reuse beat detection internally (the downbeat estimator
    /// runs the `Drums` profile).
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Drums => Self {
                frame_size: 1024,
                hop_size: 256,
                window_size: 10,
                multiplier: 1.5,
                noise_floor: 0.01,
                min_interval: 0.12,
            },
            Algorithm::Bass => Self {
                frame_size: 2048,
                hop_size: 512,
                window_size: 12,
                multiplier: 1.6,
                noise_floor: 0.008,
                min_interval: 0.2,
            },
            Algorithm::Guitar => Self {
                frame_size: 2048,
                hop_size: 512,
                window_size: 10,
                multiplier: 1.4,
                noise_floor: 0.006,
                min_interval: 0.15,
            },
            Algorithm::Vocals => Self {
                frame_size: 4096,
                hop_size: 1024,
                window_size: 14,
                multiplier: 1.3,
                noise_floor: 0.005,
                min_interval: 0.25,
            },
            Algorithm::Voice => Self {
                frame_size: 4096,
                hop_size: 1024,
                window_size: 16,
                multiplier: 1.35,
                noise_floor: 0.005,
                min_interval: 0.3,
            },
            Algorithm::Words => Self {
                frame_size: 2048,
                hop_size: 512,
                window_size: 8,
                multiplier: 1.25,
                noise_floor: 0.004,
                min_interval: 0.18,
            },
            Algorithm::Sentences => Self {
                frame_size: 8192,
                hop_size: 2048,
                window_size: 16,
                multiplier: 1.5,
                noise_floor: 0.006,
                min_interval: 0.8,
            },
            Algorithm::Melody => Self {
                frame_size: 4096,
                hop_size: 1024,
                window_size: 12,
                multiplier: 1.3,
                noise_floor: 0.005,
                min_interval: 0.22,
            },
            Algorithm::Brass => Self {
                frame_size: 2048,
                hop_size: 512,
                window_size: 10,
                multiplier: 1.45,
                noise_floor: 0.007,
                min_interval: 0.2,
            },
            Algorithm::Keys => Self {
                frame_size: 4096,
                hop_size: 1024,
                window_size: 12,
                multiplier: 1.35,
                noise_floor: 0.005,
                min_interval: 0.2,
            },
            Algorithm::Energy
            | Algorithm::Spectral
            | Algorithm::Silence
            | Algorithm::Downbeats
            | Algorithm::Phrases
            | Algorithm::Intensity
            | Algorithm::Harmonic => Self::balanced(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Algorithm; 17] = [
        Algorithm::Drums,
        Algorithm::Bass,
        Algorithm::Guitar,
        Algorithm::Vocals,
        Algorithm::Voice,
        Algorithm::Words,
        Algorithm::Sentences,
        Algorithm::Melody,
        Algorithm::Brass,
        Algorithm::Keys,
        Algorithm::Energy,
        Algorithm::Spectral,
        Algorithm::Silence,
        Algorithm::Downbeats,
        Algorithm::Phrases,
        Algorithm::Intensity,
        Algorithm::Harmonic,
    ];

    #[test]
    fn test_table_invariants() {
        for algorithm in ALL {
            let p = DetectionParams::for_algorithm(algorithm);
            assert!(
                p.hop_size <= p.frame_size,
                "{:?}: hop {} > frame {}",
                algorithm,
                p.hop_size,
                p.frame_size
            );
            assert!(p.hop_size > 0, "{:?}: zero hop", algorithm);
            assert!(
                p.multiplier > 1.0,
                "{:?}: multiplier {} must exceed 1.0",
                algorithm,
                p.multiplier
            );
            assert!(
                p.min_interval >= 0.0,
                "{:?}: negative min_interval",
                algorithm
            );
            assert!(p.window_size > 0, "{:?}: zero window", algorithm);
            assert!(p.noise_floor >= 0.0, "{:?}: negative floor", algorithm);
        }
    }

    #[test]
    fn test_generic_selections_share_balanced_profile() {
        assert_eq!(
            DetectionParams::for_algorithm(Algorithm::Energy),
            DetectionParams::balanced()
        );
        assert_eq!(
            DetectionParams::for_algorithm(Algorithm::Spectral),
            DetectionParams::balanced()
        );
    }
}
