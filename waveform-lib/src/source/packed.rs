use std::io::Write;

use log::warn;

use super::{validate_layout, Payload, PeakSource, SourceAdapter, PEAK_MAX, PEAK_MIN};
use crate::error::{Result, WaveformError};

/// Size in bytes of the little-endian header preceding the peak pairs.
pub const HEADER_SIZE: usize = 20;

struct Header {
    version: i32,
    is_8_bit: bool,
    sample_rate: u32,
    samples_per_pixel: u32,
    length: usize,
}

/// Packed binary peak storage.
///
/// Layout (little-endian): version `i32`, bit-depth flag `u32` (nonzero means
/// 8-bit), sample rate `i32`, samples per pixel `i32`, column count `u32`,
/// then one `i8` per stored peak value.
#[derive(Debug, Clone)]
pub struct PackedSource {
    version: i32,
    is_8_bit: bool,
    sample_rate: u32,
    samples_per_pixel: u32,
    length: usize,
    bytes: Vec<u8>,
}

impl PackedSource {
    /// Decode a packed buffer, validating the header and the peak area size.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidFormat`] if the buffer is shorter than the
    /// header, the peak area does not hold `2 * length` values, or the sample
    /// rate or scale is not positive.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let header = read_header(&bytes)?;
        if !header.is_8_bit {
            warn!("16-bit packed waveform data is read as 8-bit values");
        }

        Ok(Self {
            version: header.version,
            is_8_bit: header.is_8_bit,
            sample_rate: header.sample_rate,
            samples_per_pixel: header.samples_per_pixel,
            length: header.length,
            bytes,
        })
    }

    /// The full buffer, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl PeakSource for PackedSource {
    fn version(&self) -> i32 {
        self.version
    }

    fn is_8_bit(&self) -> bool {
        self.is_8_bit
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    fn length(&self) -> usize {
        self.length
    }

    fn peak_at(&self, index: usize) -> i32 {
        i32::from(self.bytes[HEADER_SIZE + index] as i8)
    }
}

impl SourceAdapter for PackedSource {
    fn is_compatible(payload: &Payload) -> bool {
        matches!(payload, Payload::Bytes(_))
    }

    fn from_payload(payload: Payload) -> Result<Self> {
        match payload {
            Payload::Bytes(bytes) => Self::from_bytes(bytes),
            _ => Err(WaveformError::InvalidFormat(
                "packed waveform data must be a binary buffer".to_string(),
            )),
        }
    }
}

/// Encode any source into the packed binary layout.
///
/// Values outside the 8-bit range are clamped. The bit-depth flag mirrors the
/// source's flag even though values are always written as one byte each.
///
/// # Errors
/// Returns [`WaveformError::InvalidFormat`] if the sample rate or scale exceeds
/// `i32`, or the column count exceeds `u32`.
pub fn encode_packed<S: PeakSource + ?Sized>(source: &S) -> Result<Vec<u8>> {
    let values = source.length() * 2;
    let mut out = Vec::with_capacity(HEADER_SIZE + values);
    write_header(&mut out, source)?;
    out.extend((0..values).map(|index| {
        let value = source.peak_at(index).clamp(PEAK_MIN, PEAK_MAX) as i8;
        value as u8
    }));
    Ok(out)
}

fn write_header<W: Write, S: PeakSource + ?Sized>(writer: &mut W, source: &S) -> Result<()> {
    let bit_flag: u32 = if source.is_8_bit() { 1 } else { 0 };
    let sample_rate = i32::try_from(source.sample_rate()).map_err(|_| {
        WaveformError::InvalidFormat("sample rate exceeds i32 range".to_string())
    })?;
    let scale = i32::try_from(source.samples_per_pixel()).map_err(|_| {
        WaveformError::InvalidFormat("samples per pixel exceeds i32 range".to_string())
    })?;
    let length = u32::try_from(source.length()).map_err(|_| {
        WaveformError::InvalidFormat("column count exceeds u32 range".to_string())
    })?;

    writer.write_all(&source.version().to_le_bytes())?;
    writer.write_all(&bit_flag.to_le_bytes())?;
    writer.write_all(&sample_rate.to_le_bytes())?;
    writer.write_all(&scale.to_le_bytes())?;
    writer.write_all(&length.to_le_bytes())?;
    Ok(())
}

fn read_header(bytes: &[u8]) -> Result<Header> {
    if bytes.len() < HEADER_SIZE {
        return Err(WaveformError::InvalidFormat(format!(
            "packed header needs {} bytes, found {}",
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let word = |at: usize| [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]];

    let version = i32::from_le_bytes(word(0));
    let bit_flag = u32::from_le_bytes(word(4));
    let sample_rate = i32::from_le_bytes(word(8));
    let samples_per_pixel = i32::from_le_bytes(word(12));
    let length = u32::from_le_bytes(word(16)) as usize;

    validate_layout(
        i64::from(sample_rate),
        i64::from(samples_per_pixel),
        length,
        bytes.len() - HEADER_SIZE,
    )?;

    Ok(Header {
        version,
        is_8_bit: bit_flag != 0,
        sample_rate: sample_rate as u32,
        samples_per_pixel: samples_per_pixel as u32,
        length,
    })
}
