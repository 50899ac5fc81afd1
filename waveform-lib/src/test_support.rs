//! Fixture builders shared by the unit tests.

use serde_json::json;

use crate::source::{PeakRecord, RecordSource};
use crate::waveform::WaveformData;

/// Packed buffer with version 1 and the 8-bit flag set.
pub fn packed_bytes(sample_rate: i32, samples_per_pixel: i32, columns: &[(i8, i8)]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(20 + columns.len() * 2);
    bytes.extend_from_slice(&1_i32.to_le_bytes());
    bytes.extend_from_slice(&1_u32.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&samples_per_pixel.to_le_bytes());
    bytes.extend_from_slice(&(columns.len() as u32).to_le_bytes());
    for &(min, max) in columns {
        bytes.push(min as u8);
        bytes.push(max as u8);
    }
    bytes
}

/// JSON text for a record without `version`/`bits`, so defaults apply.
pub fn record_json(sample_rate: u32, samples_per_pixel: u32, columns: &[(i8, i8)]) -> String {
    let data: Vec<i32> = columns
        .iter()
        .flat_map(|&(min, max)| [i32::from(min), i32::from(max)])
        .collect();
    json!({
        "sample_rate": sample_rate,
        "samples_per_pixel": samples_per_pixel,
        "length": columns.len(),
        "data": data,
    })
    .to_string()
}

/// Record-backed view over explicit columns.
pub fn waveform(sample_rate: u32, samples_per_pixel: u32, columns: &[(i32, i32)]) -> WaveformData {
    let data = columns
        .iter()
        .flat_map(|&(min, max)| [f64::from(min), f64::from(max)])
        .collect();
    let source = RecordSource::new(PeakRecord {
        version: 1,
        bits: 8,
        sample_rate,
        samples_per_pixel,
        length: columns.len(),
        data,
    })
    .expect("fixture record");
    WaveformData::new(source)
}

/// Deterministic pseudo-random columns with `min <= max`.
pub fn ramp_columns(length: usize) -> Vec<(i32, i32)> {
    (0..length)
        .map(|i| {
            let a = ((i * 37 + 11) % 256) as i32 - 128;
            let b = ((i * 91 + 5) % 256) as i32 - 128;
            (a.min(b), a.max(b))
        })
        .collect()
}
