//! Windowed view over a peak source.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::error::{Result, WaveformError};
use crate::resample::{resample_source, ResampleOptions};
use crate::segment::{Segment, SegmentView, DEFAULT_SEGMENT};
use crate::source::{AnySource, Payload, PeakSource, SourceKind, TransportResponse};

/// Which half of a stored peak pair to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakChannel {
    Min,
    Max,
}

impl PeakChannel {
    fn correction(self) -> usize {
        match self {
            Self::Min => 0,
            Self::Max => 1,
        }
    }
}

/// A peak source plus a mutable offset window and named segments.
///
/// The window `[offset_start, offset_end)` always satisfies
/// `offset_start < offset_end <= length`, except for zero-length sources where
/// it is the empty range `[0, 0)`.
#[derive(Debug, Clone)]
pub struct WaveformData {
    source: Arc<AnySource>,
    offset_start: usize,
    offset_end: usize,
    segments: HashMap<String, Segment>,
}

impl WaveformData {
    /// Wrap a source with a full-range window.
    pub fn new(source: impl Into<AnySource>) -> Self {
        Self::from_shared(Arc::new(source.into()))
    }

    /// Wrap a source that other views may also hold.
    pub fn from_shared(source: Arc<AnySource>) -> Self {
        let length = source.length();
        Self {
            source,
            offset_start: 0,
            offset_end: length,
            segments: HashMap::new(),
        }
    }

    /// Build a view using an explicitly chosen adapter.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidFormat`] if the adapter cannot decode `payload`.
    pub fn from_payload(payload: Payload, kind: SourceKind) -> Result<Self> {
        kind.build(payload).map(Self::new)
    }

    /// Detect the adapter for `payload` and build a view with it.
    ///
    /// # Errors
    /// Returns [`WaveformError::DetectionFailed`] if no adapter accepts the payload,
    /// or the adapter's decode error.
    pub fn create(payload: impl Into<Payload>) -> Result<Self> {
        let payload = payload.into();
        let kind = SourceKind::detect(&payload)?;
        Self::from_payload(payload, kind)
    }

    /// Unwrap a transport response and detect its adapter.
    ///
    /// # Errors
    /// Returns [`WaveformError::DetectionFailed`] if the response has no usable body.
    pub fn create_from_response(response: TransportResponse) -> Result<Self> {
        let payload = response
            .into_payload()
            .ok_or(WaveformError::DetectionFailed)?;
        Self::create(payload)
    }

    pub fn source(&self) -> &AnySource {
        &self.source
    }

    /// A handle to the backing source for building sibling views.
    pub fn shared_source(&self) -> Arc<AnySource> {
        Arc::clone(&self.source)
    }

    /// Replace the offset window with `[start, end)`.
    ///
    /// `end` beyond the source length is clamped rather than rejected.
    ///
    /// # Errors
    /// Returns [`WaveformError::Range`] if `end < 0`, `end <= start`, `start < 0`,
    /// or `start >= length`. The window is unchanged on error.
    pub fn offset(&mut self, start: i64, end: i64) -> Result<()> {
        let length = self.source.length() as i64;

        if end < 0 {
            return Err(WaveformError::Range(
                "end point must be non-negative".to_string(),
            ));
        }
        if end <= start {
            return Err(WaveformError::Range(
                "end point must come after the start point".to_string(),
            ));
        }
        if start < 0 {
            return Err(WaveformError::Range(
                "start point must be non-negative".to_string(),
            ));
        }
        if start >= length {
            return Err(WaveformError::Range(format!(
                "start point {} must be within range (length {})",
                start, length
            )));
        }

        self.offset_start = start as usize;
        self.offset_end = end.min(length) as usize;
        debug!(
            "waveform offset set to [{}, {})",
            self.offset_start, self.offset_end
        );
        Ok(())
    }

    pub fn offset_start(&self) -> usize {
        self.offset_start
    }

    pub fn offset_end(&self) -> usize {
        self.offset_end
    }

    pub fn offset_length(&self) -> usize {
        self.offset_end - self.offset_start
    }

    /// Minimum peak of every column in the current window.
    pub fn min(&self) -> Vec<i32> {
        self.offset_values(self.offset_start, self.offset_length(), PeakChannel::Min)
    }

    /// Maximum peak of every column in the current window.
    pub fn max(&self) -> Vec<i32> {
        self.offset_values(self.offset_start, self.offset_length(), PeakChannel::Max)
    }

    /// Read one channel for `length` columns starting at column `start`.
    ///
    /// # Panics
    /// Panics if the range reaches past the end of the source.
    pub fn offset_values(&self, start: usize, length: usize, channel: PeakChannel) -> Vec<i32> {
        let correction = start * 2 + channel.correction();
        (0..length)
            .map(|i| self.source.peak_at(i * 2 + correction))
            .collect()
    }

    /// Stored value at an absolute flat index, ignoring the window.
    pub fn at(&self, index: usize) -> i32 {
        self.source.peak_at(index)
    }

    pub fn min_sample(&self, column: usize) -> i32 {
        self.at(column * 2)
    }

    pub fn max_sample(&self, column: usize) -> i32 {
        self.at(column * 2 + 1)
    }

    /// Length of the whole source in seconds.
    pub fn duration(&self) -> f64 {
        self.columns_to_seconds(self.source.length())
    }

    /// Length of the current window in seconds.
    pub fn offset_duration(&self) -> f64 {
        self.columns_to_seconds(self.offset_length())
    }

    pub fn pixels_per_second(&self) -> f64 {
        f64::from(self.source.sample_rate()) / f64::from(self.source.samples_per_pixel())
    }

    pub fn seconds_per_pixel(&self) -> f64 {
        f64::from(self.source.samples_per_pixel()) / f64::from(self.source.sample_rate())
    }

    /// Column containing time `seconds`.
    pub fn at_time(&self, seconds: f64) -> i64 {
        let samples = seconds * f64::from(self.source.sample_rate());
        (samples / f64::from(self.source.samples_per_pixel())).floor() as i64
    }

    /// Start time of `column`, in seconds.
    pub fn time(&self, column: i64) -> f64 {
        column as f64 * self.seconds_per_pixel()
    }

    pub fn in_offset(&self, column: i64) -> bool {
        column >= self.offset_start as i64 && column < self.offset_end as i64
    }

    /// Create or replace a segment. `None` uses the `"default"` identifier.
    pub fn set_segment(
        &mut self,
        start: i64,
        end: i64,
        identifier: Option<&str>,
    ) -> SegmentView<'_> {
        let identifier = identifier.unwrap_or(DEFAULT_SEGMENT).to_string();
        let segment = Segment::new(start, end);
        self.segments.insert(identifier, segment);
        SegmentView::new(self, segment)
    }

    pub fn segment(&self, identifier: &str) -> Option<SegmentView<'_>> {
        self.segments
            .get(identifier)
            .map(|segment| SegmentView::new(self, *segment))
    }

    pub fn remove_segment(&mut self, identifier: &str) -> Option<Segment> {
        self.segments.remove(identifier)
    }

    /// All segments, in no particular order.
    pub fn segments(&self) -> impl Iterator<Item = (&str, SegmentView<'_>)> + '_ {
        self.segments
            .iter()
            .map(move |(id, segment)| (id.as_str(), SegmentView::new(self, *segment)))
    }

    /// Derive a coarser view. The receiver and its source are left untouched.
    ///
    /// # Errors
    /// See [`resample_source`].
    pub fn resample(&self, options: impl Into<ResampleOptions>) -> Result<WaveformData> {
        let options = options.into();
        resample_source(self.source.as_ref(), &options).map(WaveformData::new)
    }

    fn columns_to_seconds(&self, columns: usize) -> f64 {
        columns as f64 * f64::from(self.source.samples_per_pixel())
            / f64::from(self.source.sample_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{packed_bytes, ramp_columns, record_json, waveform};

    #[test]
    fn starts_with_full_window() {
        let view = waveform(44_100, 512, &ramp_columns(120));
        assert_eq!(view.offset_start(), 0);
        assert_eq!(view.offset_end(), 120);
        assert_eq!(view.offset_length(), 120);
        assert_eq!(view.min().len(), 120);
    }

    #[test]
    fn offset_yields_window_sized_sequences() {
        let columns = ramp_columns(64);
        let mut view = waveform(8_000, 4, &columns);
        for (start, end) in [(0, 64), (0, 1), (5, 9), (63, 64), (10, 64)] {
            view.offset(start, end).expect("offset");
            let expected_len = (end - start) as usize;
            assert_eq!(view.offset_length(), expected_len);

            let min = view.min();
            let max = view.max();
            assert_eq!(min.len(), expected_len);
            assert_eq!(max.len(), expected_len);
            for (i, column) in columns[start as usize..end as usize].iter().enumerate() {
                assert_eq!(min[i], column.0);
                assert_eq!(max[i], column.1);
            }
        }
    }

    #[test]
    fn offset_rejects_invalid_bounds_and_keeps_window() {
        let mut view = waveform(8_000, 4, &ramp_columns(10));
        view.offset(2, 6).expect("offset");

        for (start, end) in [(0, -1), (5, 5), (6, 3), (-1, 4), (10, 12), (11, 20)] {
            assert!(
                matches!(view.offset(start, end), Err(WaveformError::Range(_))),
                "({}, {}) should be rejected",
                start,
                end
            );
            assert_eq!((view.offset_start(), view.offset_end()), (2, 6));
        }
    }

    #[test]
    fn offset_clamps_end() {
        let mut view = waveform(8_000, 4, &ramp_columns(10));
        view.offset(3, 1_000).expect("offset");
        assert_eq!(view.offset_end(), 10);
        assert_eq!(view.offset_length(), 7);
    }

    #[test]
    fn duration_ignores_window() {
        let mut view = waveform(1_000, 10, &ramp_columns(200));
        assert_eq!(view.duration(), 2.0);
        assert_eq!(view.offset_duration(), 2.0);

        view.offset(50, 100).expect("offset");
        assert_eq!(view.duration(), 2.0);
        assert_eq!(view.offset_duration(), 0.5);
    }

    #[test]
    fn time_conversions() {
        let view = waveform(44_100, 441, &ramp_columns(10));
        assert_eq!(view.pixels_per_second(), 100.0);
        assert_eq!(view.seconds_per_pixel(), 0.01);
        assert_eq!(view.at_time(0.0), 0);
        assert_eq!(view.at_time(0.015), 1);
        assert_eq!(view.at_time(1.0), 100);

        let spp = view.seconds_per_pixel();
        for t in [0.0, 0.004, 0.25, 1.337, 7.9999] {
            let back = view.time(view.at_time(t));
            assert!(back <= t + 1e-9 && t - back < spp + 1e-9, "t = {}", t);
        }
    }

    #[test]
    fn in_offset_boundaries() {
        let mut view = waveform(8_000, 4, &ramp_columns(30));
        view.offset(10, 20).expect("offset");
        assert!(!view.in_offset(9));
        assert!(view.in_offset(10));
        assert!(view.in_offset(19));
        assert!(!view.in_offset(20));
        assert!(!view.in_offset(-1));
    }

    #[test]
    fn at_ignores_window() {
        let columns = ramp_columns(8);
        let mut view = waveform(8_000, 4, &columns);
        view.offset(4, 8).expect("offset");
        assert_eq!(view.at(0), columns[0].0);
        assert_eq!(view.at(1), columns[0].1);
        assert_eq!(view.min_sample(2), columns[2].0);
        assert_eq!(view.max_sample(7), columns[7].1);
    }

    #[test]
    fn zero_length_source_is_representable() {
        let view = WaveformData::create(packed_bytes(8_000, 4, &[])).expect("create");
        assert_eq!(view.offset_length(), 0);
        assert!(view.min().is_empty());
        assert!(view.max().is_empty());
        assert_eq!(view.duration(), 0.0);
        assert!(!view.in_offset(0));
    }

    #[test]
    fn create_detects_both_variants() {
        let columns = [(-4, 4), (-8, 9)];
        let packed = WaveformData::create(packed_bytes(16_000, 32, &columns)).expect("packed");
        let record = WaveformData::create(record_json(16_000, 32, &columns)).expect("record");

        assert_eq!(packed.source().kind(), SourceKind::PackedBinary);
        assert_eq!(record.source().kind(), SourceKind::Record);
        assert_eq!(packed.min(), record.min());
        assert_eq!(packed.max(), vec![4, 9]);
    }

    #[test]
    fn create_from_response_unwraps_body() {
        let response = TransportResponse {
            response_type: Some("arraybuffer".to_string()),
            response: Some(Payload::Bytes(packed_bytes(16_000, 32, &[(-1, 1)]))),
            response_text: None,
        };
        let view = WaveformData::create_from_response(response).expect("create");
        assert_eq!(view.source().kind(), SourceKind::PackedBinary);

        assert!(matches!(
            WaveformData::create_from_response(TransportResponse::default()),
            Err(WaveformError::DetectionFailed)
        ));
    }

    #[test]
    fn create_fails_for_unknown_payload() {
        assert!(matches!(
            WaveformData::create("plain text"),
            Err(WaveformError::DetectionFailed)
        ));
    }

    #[test]
    fn sibling_views_share_a_source() {
        let mut first = waveform(8_000, 4, &ramp_columns(40));
        let mut second = WaveformData::from_shared(first.shared_source());

        first.offset(0, 10).expect("offset");
        second.offset(30, 40).expect("offset");

        assert!(Arc::ptr_eq(&first.shared_source(), &second.shared_source()));
        assert_eq!(first.offset_length(), 10);
        assert_eq!(second.offset_start(), 30);
    }

    #[test]
    fn set_segment_replaces_by_identifier() {
        let mut view = waveform(8_000, 4, &ramp_columns(100));
        view.set_segment(1, 5, None);
        view.set_segment(10, 20, Some("intro"));
        view.set_segment(30, 40, None);

        assert_eq!(view.segments().count(), 2);
        let default = view.segment(DEFAULT_SEGMENT).expect("default segment");
        assert_eq!((default.start(), default.end()), (30, 40));

        assert!(view.remove_segment("intro").is_some());
        assert!(view.segment("intro").is_none());
    }
}
