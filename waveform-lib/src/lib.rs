//! # Waveform Data Library
//!
//! Read precomputed audio peak data (min/max pairs per pixel column) from
//! packed binary or JSON record sources, view it through a movable offset
//! window, track named segments against that window, and derive coarser
//! resolutions by merging runs of columns.

pub mod error;
pub mod resample;
pub mod segment;
pub mod source;
pub mod waveform;

#[cfg(test)]
mod test_support;

pub use error::{Result, WaveformError};
pub use resample::{resample_source, ResampleOptions};
pub use segment::{Segment, SegmentView, DEFAULT_SEGMENT};
pub use source::{
    encode_packed, AnySource, BitDepth, PackedSource, Payload, PeakRecord, PeakSource,
    RecordSource, SourceAdapter, SourceKind, TransportResponse,
};
pub use waveform::{PeakChannel, WaveformData};
