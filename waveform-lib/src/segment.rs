//! Named column ranges clipped against a view's offset window.

use crate::waveform::{PeakChannel, WaveformData};

/// Identifier used when a segment is set without one.
pub const DEFAULT_SEGMENT: &str = "default";

/// A fixed `[start, end)` column range. Callers keep `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    start: i64,
    end: i64,
}

impl Segment {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Length in columns, independent of any window.
    pub fn length(&self) -> i64 {
        self.end - self.start
    }
}

/// A segment read through its owning view.
///
/// Every visibility field is recomputed from the view's current window on
/// each call.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    owner: &'a WaveformData,
    segment: Segment,
}

impl<'a> SegmentView<'a> {
    pub(crate) fn new(owner: &'a WaveformData, segment: Segment) -> Self {
        Self { owner, segment }
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn start(&self) -> i64 {
        self.segment.start
    }

    pub fn end(&self) -> i64 {
        self.segment.end
    }

    pub fn length(&self) -> i64 {
        self.segment.length()
    }

    /// First visible column, or `None` if the segment starts nowhere in the window.
    pub fn visible_start(&self) -> Option<usize> {
        let window_start = self.owner.offset_start() as i64;
        let window_end = self.owner.offset_end() as i64;
        let Segment { start, end } = self.segment;

        if start < window_start && end > window_start {
            return Some(window_start as usize);
        }
        if start >= window_start && start < window_end {
            return Some(start as usize);
        }
        None
    }

    /// Exclusive end of the visible part, or `None`.
    pub fn visible_end(&self) -> Option<usize> {
        let window_start = self.owner.offset_start() as i64;
        let window_end = self.owner.offset_end() as i64;
        let Segment { start, end } = self.segment;

        if end > window_start && end <= window_end {
            return Some(end as usize);
        }
        if end > window_end && start < window_end {
            return Some(window_end as usize);
        }
        None
    }

    /// Visible column count, when both visible bounds exist.
    pub fn visible_length(&self) -> Option<usize> {
        let start = self.visible_start()?;
        self.visible_end()?.checked_sub(start)
    }

    pub fn is_visible(&self) -> bool {
        let window_start = self.owner.offset_start() as i64;
        let Segment { start, end } = self.segment;

        self.owner.in_offset(start)
            || self.owner.in_offset(end)
            || (window_start > start && window_start < end)
    }

    /// Minimum peaks over the visible part, empty when hidden.
    pub fn min(&self) -> Vec<i32> {
        self.visible_values(PeakChannel::Min)
    }

    /// Maximum peaks over the visible part, empty when hidden.
    pub fn max(&self) -> Vec<i32> {
        self.visible_values(PeakChannel::Max)
    }

    fn visible_values(&self, channel: PeakChannel) -> Vec<i32> {
        if !self.is_visible() {
            return Vec::new();
        }
        match (self.visible_start(), self.visible_length()) {
            (Some(start), Some(length)) => self.owner.offset_values(start, length, channel),
            _ => Vec::new(),
        }
    }
}
