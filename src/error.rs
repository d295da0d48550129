//! Error types for the cut-list generation engine

use std::fmt;

/// Errors that can occur during signal analysis or timeline synthesis
///
/// Most degraded conditions in this crate are *not* errors: short input
/// yields an empty timestamp list, an unusable beat sequence yields 0 BPM,
/// and allocator saturation resets and retries. `EngineError` is reserved
/// for genuinely invalid parameters and failed processing stages.
#[derive(Debug, Clone)]
pub enum EngineError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Processing error during analysis
    ProcessingError(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            EngineError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for EngineError {}
