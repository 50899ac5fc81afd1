use thiserror::Error;

/// Error type for source construction, windowing and resampling.
#[derive(Debug, Error)]
pub enum WaveformError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// No adapter recognised the payload.
    #[error("could not detect a waveform data adapter from the input")]
    DetectionFailed,

    /// An `offset()` bound was rejected. The window is left as it was.
    #[error("range error: {0}")]
    Range(String),

    /// Resampling can only make the data coarser.
    #[error("zoom level {requested} too low, minimum: {minimum}")]
    Resolution { requested: u32, minimum: u32 },

    #[error("invalid resample options: {0}")]
    InvalidOptions(String),

    #[error("invalid waveform data format: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for WaveformError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidFormat(value.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WaveformError>;
