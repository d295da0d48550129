//! Band isolation filtering
//!
//! Emphasizes one instrument's frequency range before onset detection by
//! running the signal through a single biquad stage followed by a
//! feed-forward dynamics compressor that tames transient peaks.
//!
//! The filter never mutates its input: it renders into a fresh
//! [`SampleBuffer`] of identical length and sample rate. When rendering
//! fails the caller proceeds with the unfiltered buffer; a failed filter
//! stage must not abort an analysis pass.

use crate::config::Algorithm;
use crate::error::EngineError;
use crate::io::sample_buffer::SampleBuffer;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Compressor threshold in dBFS
const COMP_THRESHOLD_DB: f32 = -24.0;

/// Compressor ratio
const COMP_RATIO: f32 = 12.0;

/// Compressor attack in seconds
const COMP_ATTACK_S: f32 = 0.003;

/// Compressor release in seconds
const COMP_RELEASE_S: f32 = 0.25;

/// Biquad response shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Pass below the cutoff
    Lowpass,
    /// Pass above the cutoff
    Highpass,
    /// Pass a band around the center frequency
    Bandpass,
}

/// One band-isolation stage: response shape, center/cutoff frequency, Q
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandFilter {
    /// Response shape
    pub mode: FilterMode,
    /// Center (bandpass) or cutoff (lowpass/highpass) frequency in Hz
    pub frequency: f32,
    /// Resonance/selectivity
    pub q: f32,
}

impl BandFilter {
    /// Static filter table for the instrument-tracking algorithms
    ///
    /// Non-instrument algorithms analyze the unfiltered signal and return
    /// `None` here.
    pub fn for_algorithm(algorithm: Algorithm) -> Option<BandFilter> {
        use FilterMode::*;
        let (mode, frequency, q) = match algorithm {
            Algorithm::Drums => (Lowpass, 150.0, 0.9),
            Algorithm::Bass => (Lowpass, 250.0, 0.8),
            Algorithm::Guitar => (Bandpass, 2500.0, 1.0),
            Algorithm::Vocals => (Bandpass, 1200.0, 0.9),
            Algorithm::Voice => (Bandpass, 300.0, 1.0),
            Algorithm::Words => (Highpass, 2000.0, 0.7),
            Algorithm::Sentences => (Bandpass, 400.0, 0.5),
            Algorithm::Melody => (Bandpass, 800.0, 0.8),
            Algorithm::Brass => (Bandpass, 600.0, 1.0),
            Algorithm::Keys => (Bandpass, 1000.0, 0.7),
            Algorithm::Energy
            | Algorithm::Spectral
            | Algorithm::Silence
            | Algorithm::Downbeats
            | Algorithm::Phrases
            | Algorithm::Intensity
            | Algorithm::Harmonic => return None,
        };
        Some(BandFilter { mode, frequency, q })
    }
}

/// Render a band-isolated copy of the buffer
///
/// Applies the biquad stage described by `filter`, then a dynamics
/// compression stage, and finally rescales the result to the input's peak
/// level so downstream thresholds see a consistent amplitude range.
///
/// # Arguments
///
/// * `buffer` - Input signal; left untouched
/// * `filter` - Filter stage from [`BandFilter::for_algorithm`]
///
/// # Returns
///
/// A new buffer of identical length and sample rate
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` if the filter frequency is not below
/// the Nyquist frequency or Q is non-positive. Callers fall back to the
/// unfiltered buffer on error rather than failing the analysis pass.
pub fn isolate_band(
    buffer: &SampleBuffer,
    filter: BandFilter,
) -> Result<SampleBuffer, EngineError> {
    let sample_rate = buffer.sample_rate() as f32;
    let nyquist = sample_rate / 2.0;

    if filter.frequency <= 0.0 || filter.frequency >= nyquist {
        return Err(EngineError::InvalidInput(format!(
            "Filter frequency {:.1} Hz outside (0, {:.1})",
            filter.frequency, nyquist
        )));
    }

    if filter.q <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "Filter Q must be > 0, got {}",
            filter.q
        )));
    }

    log::debug!(
        "Band isolation: {:?} at {:.0} Hz (Q={:.2}), {} samples",
        filter.mode,
        filter.frequency,
        filter.q,
        buffer.len()
    );

    if buffer.is_empty() {
        return SampleBuffer::new(Vec::new(), buffer.sample_rate());
    }

    let filtered = biquad(buffer.samples(), sample_rate, filter);
    let compressed = compress(&filtered, sample_rate);

    // Rescale to the input's peak so filtering doesn't shift the absolute
    // level the onset thresholds operate on.
    let input_peak = peak(buffer.samples());
    let output_peak = peak(&compressed);
    let rendered = if output_peak > EPSILON && input_peak > EPSILON {
        let gain = input_peak / output_peak;
        compressed.iter().map(|&x| x * gain).collect()
    } else {
        compressed
    };

    SampleBuffer::new(rendered, buffer.sample_rate())
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Single biquad stage, RBJ cookbook coefficients, direct form I
fn biquad(samples: &[f32], sample_rate: f32, filter: BandFilter) -> Vec<f32> {
    let omega = 2.0 * std::f32::consts::PI * filter.frequency / sample_rate;
    let (sin_w, cos_w) = omega.sin_cos();
    let alpha = sin_w / (2.0 * filter.q);

    let (b0, b1, b2) = match filter.mode {
        FilterMode::Lowpass => {
            let b1 = 1.0 - cos_w;
            (b1 / 2.0, b1, b1 / 2.0)
        }
        FilterMode::Highpass => {
            let b1 = -(1.0 + cos_w);
            (-b1 / 2.0, b1, -b1 / 2.0)
        }
        FilterMode::Bandpass => (alpha, 0.0, -alpha),
    };
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w;
    let a2 = 1.0 - alpha;

    let (b0, b1, b2, a1, a2) = (b0 / a0, b1 / a0, b2 / a0, a1 / a0, a2 / a0);

    let mut out = Vec::with_capacity(samples.len());
    let (mut x1, mut x2, mut y1, mut y2) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);

    for &x in samples {
        let y = b0 * x + b1 * x1 + b2 * x2 - a1 * y1 - a2 * y2;
        x2 = x1;
        x1 = x;
        y2 = y1;
        y1 = y;
        out.push(y);
    }

    out
}

/// Feed-forward compressor with a peak envelope follower
fn compress(samples: &[f32], sample_rate: f32) -> Vec<f32> {
    let attack_coeff = (-1.0 / (COMP_ATTACK_S * sample_rate)).exp();
    let release_coeff = (-1.0 / (COMP_RELEASE_S * sample_rate)).exp();
    let slope = 1.0 - 1.0 / COMP_RATIO;

    let mut out = Vec::with_capacity(samples.len());
    let mut envelope = 0.0f32;

    for &x in samples {
        let level = x.abs();
        let coeff = if level > envelope {
            attack_coeff
        } else {
            release_coeff
        };
        envelope = coeff * envelope + (1.0 - coeff) * level;

        let gain = if envelope > EPSILON {
            let env_db = 20.0 * envelope.log10();
            let over_db = env_db - COMP_THRESHOLD_DB;
            if over_db > 0.0 {
                10.0f32.powf(-over_db * slope / 20.0)
            } else {
                1.0
            }
        } else {
            1.0
        };

        out.push(x * gain);
    }

    out
}
