//! Immutable mono sample buffer
//!
//! The engine consumes audio as a mono sequence of `f32` samples in
//! [-1.0, 1.0] plus a sample rate. Buffers are immutable once constructed;
//! stages that change the signal (the band isolation filter) produce a new
//! buffer instead of mutating their input.

use crate::error::EngineError;

/// Mono PCM buffer with its sample rate
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a buffer from decoded mono samples
    ///
    /// # Arguments
    ///
    /// * `samples` - Mono samples, normalized to [-1.0, 1.0]
    /// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the sample rate is zero.
    /// An empty sample vector is allowed; every detector treats it as
    /// too-short input and returns no events.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self, EngineError> {
        if sample_rate == 0 {
            return Err(EngineError::InvalidInput(
                "Sample rate must be > 0".to_string(),
            ));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Samples as a slice
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True if the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Track duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 44100 * 2], 44100).unwrap();
        assert!((buffer.duration_seconds() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(SampleBuffer::new(vec![0.0; 100], 0).is_err());
    }

    #[test]
    fn test_empty_buffer_allowed() {
        let buffer = SampleBuffer::new(vec![], 44100).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.duration_seconds(), 0.0);
    }
}
