//! Peak sources: the uniform read contract over packed-binary and JSON record storage.

mod packed;
mod payload;
mod record;

use log::debug;

use crate::error::{Result, WaveformError};

pub use packed::{encode_packed, PackedSource, HEADER_SIZE};
pub use payload::{Payload, TransportResponse};
pub use record::{PeakRecord, RecordSource};

/// Smallest value a stored peak can take.
pub const PEAK_MIN: i32 = -128;
/// Largest value a stored peak can take.
pub const PEAK_MAX: i32 = 127;

/// Bit depth flag carried by every source.
///
/// Only 8-bit values are decoded; 16-bit is recognised but read as 8-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    Eight,
    Sixteen,
}

impl BitDepth {
    pub fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

/// Read-only accessor contract shared by all peak storage variants.
///
/// Peaks are stored flat as `[min_0, max_0, min_1, max_1, ...]`, so a source
/// of `length()` columns holds `2 * length()` values.
pub trait PeakSource {
    /// Format version, informational only.
    fn version(&self) -> i32;

    fn is_8_bit(&self) -> bool;

    fn is_16_bit(&self) -> bool {
        !self.is_8_bit()
    }

    fn bit_depth(&self) -> BitDepth {
        if self.is_8_bit() {
            BitDepth::Eight
        } else {
            BitDepth::Sixteen
        }
    }

    /// Sample rate of the original audio, in samples per second.
    fn sample_rate(&self) -> u32;

    /// Number of original audio samples collapsed into one column.
    fn samples_per_pixel(&self) -> u32;

    /// Number of pixel columns.
    fn length(&self) -> usize;

    /// Stored value at a flat index in `[0, 2 * length())`, rounded to an integer.
    ///
    /// # Panics
    /// Panics if `index` lies outside the backing storage.
    fn peak_at(&self, index: usize) -> i32;
}

/// Static half of the adapter contract: probing and construction from a payload.
pub trait SourceAdapter: PeakSource + Sized {
    /// Report whether this adapter can interpret `payload`.
    fn is_compatible(payload: &Payload) -> bool;

    /// Build the adapter from a raw transport payload.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidFormat`] if the payload cannot be decoded.
    fn from_payload(payload: Payload) -> Result<Self>;
}

/// The closed set of storage variants a waveform view can wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PackedBinary,
    Record,
}

impl SourceKind {
    /// Detection order. Packed binary is probed first.
    pub const DETECTION_ORDER: [SourceKind; 2] = [SourceKind::PackedBinary, SourceKind::Record];

    /// Pick the first adapter, in [`SourceKind::DETECTION_ORDER`], that accepts `payload`.
    ///
    /// # Errors
    /// Returns [`WaveformError::DetectionFailed`] if no adapter accepts it.
    pub fn detect(payload: &Payload) -> Result<Self> {
        let kind = Self::DETECTION_ORDER
            .into_iter()
            .find(|kind| kind.accepts(payload))
            .ok_or(WaveformError::DetectionFailed)?;
        debug!("detected {:?} waveform source", kind);
        Ok(kind)
    }

    pub fn accepts(self, payload: &Payload) -> bool {
        match self {
            Self::PackedBinary => PackedSource::is_compatible(payload),
            Self::Record => RecordSource::is_compatible(payload),
        }
    }

    /// Construct the adapter of this kind from `payload`.
    pub fn build(self, payload: Payload) -> Result<AnySource> {
        match self {
            Self::PackedBinary => PackedSource::from_payload(payload).map(AnySource::Packed),
            Self::Record => RecordSource::from_payload(payload).map(AnySource::Record),
        }
    }
}

/// A source of either storage variant.
#[derive(Debug, Clone)]
pub enum AnySource {
    Packed(PackedSource),
    Record(RecordSource),
}

impl AnySource {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Packed(_) => SourceKind::PackedBinary,
            Self::Record(_) => SourceKind::Record,
        }
    }
}

impl PeakSource for AnySource {
    fn version(&self) -> i32 {
        match self {
            Self::Packed(source) => source.version(),
            Self::Record(source) => source.version(),
        }
    }

    fn is_8_bit(&self) -> bool {
        match self {
            Self::Packed(source) => source.is_8_bit(),
            Self::Record(source) => source.is_8_bit(),
        }
    }

    fn sample_rate(&self) -> u32 {
        match self {
            Self::Packed(source) => source.sample_rate(),
            Self::Record(source) => source.sample_rate(),
        }
    }

    fn samples_per_pixel(&self) -> u32 {
        match self {
            Self::Packed(source) => source.samples_per_pixel(),
            Self::Record(source) => source.samples_per_pixel(),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Packed(source) => source.length(),
            Self::Record(source) => source.length(),
        }
    }

    fn peak_at(&self, index: usize) -> i32 {
        match self {
            Self::Packed(source) => source.peak_at(index),
            Self::Record(source) => source.peak_at(index),
        }
    }
}

impl From<PackedSource> for AnySource {
    fn from(value: PackedSource) -> Self {
        Self::Packed(value)
    }
}

impl From<RecordSource> for AnySource {
    fn from(value: RecordSource) -> Self {
        Self::Record(value)
    }
}

/// Checks shared by both adapters before a source is handed out.
fn validate_layout(
    sample_rate: i64,
    samples_per_pixel: i64,
    length: usize,
    stored_values: usize,
) -> Result<()> {
    if sample_rate <= 0 {
        return Err(WaveformError::InvalidFormat(format!(
            "sample_rate must be positive, got {}",
            sample_rate
        )));
    }

    if samples_per_pixel <= 0 {
        return Err(WaveformError::InvalidFormat(format!(
            "samples_per_pixel must be at least 1, got {}",
            samples_per_pixel
        )));
    }

    let required = length.checked_mul(2).ok_or_else(|| {
        WaveformError::InvalidFormat("column count exceeds addressable memory size".to_string())
    })?;
    if stored_values < required {
        return Err(WaveformError::InvalidFormat(format!(
            "expected {} peak values for {} columns, found {}",
            required, length, stored_values
        )));
    }

    Ok(())
}
