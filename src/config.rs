//! Configuration for analysis and timeline generation
//!
//! All behavior selection goes through closed enums rather than string tags,
//! so a missing table entry is a compile error instead of a silent fallback.

use serde::{Deserialize, Serialize};

/// Analysis algorithm: which detector runs and which band filter (if any)
/// is applied before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// Kick/snare transients (low band)
    Drums,
    /// Bassline movement (low band)
    Bass,
    /// Guitar strums and riffs (mid band)
    Guitar,
    /// Sung vocal onsets (presence band)
    Vocals,
    /// Spoken voice onsets (low-mid band)
    Voice,
    /// Individual word transients (high band)
    Words,
    /// Sentence-scale speech groupings (low-mid band, long windows)
    Sentences,
    /// Melodic lead movement (mid band)
    Melody,
    /// Brass section hits (mid band)
    Brass,
    /// Keys/synth chord changes (mid band)
    Keys,
    /// Generic energy-based detection, no filtering
    Energy,
    /// Generic detection tuned like `Energy`; kept as a separate selection
    /// because callers distinguish the two in their UI
    Spectral,
    /// Sound-resume boundaries after silence gaps
    Silence,
    /// Estimated bar starts (every ~4 beats)
    Downbeats,
    /// Estimated musical phrases (every 4-8 downbeats)
    Phrases,
    /// Loudness build-ups and drops
    Intensity,
    /// Tonal/harmonic shifts
    Harmonic,
}

impl Algorithm {
    /// True for the instrument-tracking modes that run the band isolation
    /// filter before onset detection
    pub fn is_instrument(&self) -> bool {
        matches!(
            self,
            Algorithm::Drums
                | Algorithm::Bass
                | Algorithm::Guitar
                | Algorithm::Vocals
                | Algorithm::Voice
                | Algorithm::Words
                | Algorithm::Sentences
                | Algorithm::Melody
                | Algorithm::Brass
                | Algorithm::Keys
        )
    }

    /// True for the structural detectors built on top of the raw envelope
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Algorithm::Silence
                | Algorithm::Downbeats
                | Algorithm::Phrases
                | Algorithm::Intensity
                | Algorithm::Harmonic
        )
    }

    /// True for the percussive/vocal modes whose legacy scheduling uses a
    /// single-candidate beat window
    pub fn is_tight_tracking(&self) -> bool {
        matches!(self, Algorithm::Drums | Algorithm::Vocals | Algorithm::Voice)
    }

    /// Short stable tag, used in settings fingerprints
    pub fn tag(&self) -> &'static str {
        match self {
            Algorithm::Drums => "drums",
            Algorithm::Bass => "bass",
            Algorithm::Guitar => "guitar",
            Algorithm::Vocals => "vocals",
            Algorithm::Voice => "voice",
            Algorithm::Words => "words",
            Algorithm::Sentences => "sentences",
            Algorithm::Melody => "melody",
            Algorithm::Brass => "brass",
            Algorithm::Keys => "keys",
            Algorithm::Energy => "energy",
            Algorithm::Spectral => "spectral",
            Algorithm::Silence => "silence",
            Algorithm::Downbeats => "downbeats",
            Algorithm::Phrases => "phrases",
            Algorithm::Intensity => "intensity",
            Algorithm::Harmonic => "harmonic",
        }
    }
}

/// Scheduling mode for cut-point generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoMode {
    /// Cuts land on detected beats, striding by `skip_every_n`
    BeatLocked,
    /// Cuts follow a uniform BPM grid, independent of individual beats
    Metronome,
    /// Legacy walker; media list is played through once, in order
    SequentialOnce,
    /// Legacy walker; media chosen at random, looping indefinitely
    RandomLoop,
}

/// Policy for choosing where inside a source item a clip's content starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropMode {
    /// Centered-leaning random placement (mean of two uniform draws)
    Smart,
    /// Uniform random placement
    Random,
    /// Midpoint of the chosen free interval
    Center,
    /// Start of the chosen free interval
    Start,
    /// End of the chosen free interval
    End,
    /// Golden-ratio point (38.2% of the slack)
    Golden,
}

/// Time-ranged override of the beat stride
///
/// Active over the half-open range `[start, end)` in track seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RhythmSegment {
    /// Range start in seconds (inclusive)
    pub start: f32,
    /// Range end in seconds (exclusive)
    pub end: f32,
    /// Beat stride to use inside the range
    pub skip_every_n: u32,
}

/// User-facing sync settings driving analysis and timeline generation
///
/// A settings value fully determines the engine's output: analysis results
/// carry `fingerprint()` so callers can discard stale results after a
/// settings change instead of interrupting a running computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Detector/filter selection
    pub algorithm: Algorithm,

    /// Minimum clip length in seconds (default: 0.5)
    pub min_duration: f32,

    /// Maximum clip length in seconds (default: 5.0)
    pub max_duration: f32,

    /// Cut-point scheduling mode (default: BeatLocked)
    pub video_mode: VideoMode,

    /// Source-offset policy (default: Smart)
    pub crop_mode: CropMode,

    /// Debounce override in milliseconds; 0 means "off", which still keeps
    /// a minimal 10 ms floor between accepted events (default: 0)
    pub beat_sensitivity_ms: u32,

    /// Clip length jitter as a percentage, 0-100 (default: 0)
    pub duration_variance: u32,

    /// Base beat stride: cut on every Nth beat (default: 1)
    pub skip_every_n: u32,

    /// Time-ranged overrides of `skip_every_n`, sorted by start time
    pub rhythm_segments: Vec<RhythmSegment>,

    /// Overrides the detected tempo in metronome mode
    pub manual_bpm: Option<f32>,

    /// Seed for the scheduler's random choices; part of the fingerprint so
    /// reproduced runs reproduce their randomness too (default: 0)
    pub seed: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Drums,
            min_duration: 0.5,
            max_duration: 5.0,
            video_mode: VideoMode::BeatLocked,
            crop_mode: CropMode::Smart,
            beat_sensitivity_ms: 0,
            duration_variance: 0,
            skip_every_n: 1,
            rhythm_segments: Vec::new(),
            manual_bpm: None,
            seed: 0,
        }
    }
}

impl SyncSettings {
    /// Effective debounce interval in seconds
    ///
    /// A sensitivity of 0 means "off" but still enforces a 10 ms floor so
    /// duplicate detections of one event collapse.
    pub fn debounce_seconds(&self) -> f32 {
        if self.beat_sensitivity_ms == 0 {
            0.01
        } else {
            self.beat_sensitivity_ms as f32 / 1000.0
        }
    }

    /// Duration variance as a fraction in [0.0, 1.0]
    pub fn variance_fraction(&self) -> f32 {
        (self.duration_variance.min(100)) as f32 / 100.0
    }

    /// Compact key identifying every setting that affects engine output
    ///
    /// Callers memoize analysis results under this key and compare it
    /// against a result's recorded fingerprint to detect staleness.
    pub fn fingerprint(&self) -> String {
        let mut segments = String::new();
        for seg in &self.rhythm_segments {
            segments.push_str(&format!(
                "{:.3}-{:.3}x{};",
                seg.start, seg.end, seg.skip_every_n
            ));
        }
        format!(
            "{}|{:.3}|{:.3}|{:?}|{:?}|{}|{}|{}|[{}]|{}|{}",
            self.algorithm.tag(),
            self.min_duration,
            self.max_duration,
            self.video_mode,
            self.crop_mode,
            self.beat_sensitivity_ms,
            self.duration_variance,
            self.skip_every_n,
            segments,
            self.manual_bpm.map(|b| format!("{:.2}", b)).unwrap_or_default(),
            self.seed,
        )
    }
}
