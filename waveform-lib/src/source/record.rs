use log::warn;
use serde::{Deserialize, Serialize};

use super::{validate_layout, Payload, PeakSource, SourceAdapter};
use crate::error::{Result, WaveformError};

fn default_version() -> i32 {
    1
}

fn default_bits() -> u8 {
    8
}

/// Structured peak record, as found in JSON waveform files.
///
/// `data` holds `2 * length` values ordered `[min_0, max_0, min_1, max_1, ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    #[serde(default = "default_version")]
    pub version: i32,
    #[serde(default = "default_bits")]
    pub bits: u8,
    pub sample_rate: u32,
    pub samples_per_pixel: u32,
    pub length: usize,
    pub data: Vec<f64>,
}

impl PeakRecord {
    /// Capture every stored value of `source` into a record.
    pub fn from_source<S: PeakSource + ?Sized>(source: &S) -> Self {
        let data = (0..source.length() * 2)
            .map(|index| f64::from(source.peak_at(index)))
            .collect();

        Self {
            version: source.version(),
            bits: source.bit_depth().bits(),
            sample_rate: source.sample_rate(),
            samples_per_pixel: source.samples_per_pixel(),
            length: source.length(),
            data,
        }
    }
}

/// Peak source backed by a [`PeakRecord`].
#[derive(Debug, Clone)]
pub struct RecordSource {
    record: PeakRecord,
}

impl RecordSource {
    /// Wrap a record after checking it can serve every column it declares.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidFormat`] if the sample rate or scale is
    /// zero, or `data` holds fewer than `2 * length` values.
    pub fn new(record: PeakRecord) -> Result<Self> {
        validate_layout(
            i64::from(record.sample_rate),
            i64::from(record.samples_per_pixel),
            record.length,
            record.data.len(),
        )?;
        if record.bits != 8 {
            warn!(
                "{}-bit waveform record is read as 8-bit values",
                record.bits
            );
        }
        Ok(Self { record })
    }

    pub fn record(&self) -> &PeakRecord {
        &self.record
    }

    pub fn into_record(self) -> PeakRecord {
        self.record
    }
}

impl PeakSource for RecordSource {
    fn version(&self) -> i32 {
        // A zero version is treated as missing.
        if self.record.version == 0 {
            1
        } else {
            self.record.version
        }
    }

    fn is_8_bit(&self) -> bool {
        self.record.bits == 8
    }

    fn sample_rate(&self) -> u32 {
        self.record.sample_rate
    }

    fn samples_per_pixel(&self) -> u32 {
        self.record.samples_per_pixel
    }

    fn length(&self) -> usize {
        self.record.length
    }

    fn peak_at(&self, index: usize) -> i32 {
        self.record.data[index].round() as i32
    }
}

impl SourceAdapter for RecordSource {
    fn is_compatible(payload: &Payload) -> bool {
        payload
            .to_json()
            .is_some_and(|value| value.get("sample_rate").is_some())
    }

    fn from_payload(payload: Payload) -> Result<Self> {
        let record = match payload {
            Payload::Text(text) => serde_json::from_str::<PeakRecord>(&text)?,
            Payload::Json(value) => serde_json::from_value::<PeakRecord>(value)?,
            Payload::Bytes(_) => {
                return Err(WaveformError::InvalidFormat(
                    "waveform records must be JSON text or a parsed JSON value".to_string(),
                ))
            }
        };
        Self::new(record)
    }
}
