//! Peak-merge downsampling of a peak source to a coarser scale.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveformError};
use crate::source::{PeakRecord, PeakSource, RecordSource, PEAK_MAX, PEAK_MIN};

/// Target resolution and walk parameters for [`resample_source`].
///
/// `scale` wins over `width` when both are set. A zero `scale` counts as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleOptions {
    /// Desired output width in columns; the scale is derived from the duration.
    pub width: Option<usize>,
    /// Explicit target samples per pixel.
    pub scale: Option<u32>,
    /// Begin the walk at this time, in seconds. Ignored when a resume index is set.
    pub start_time: Option<f64>,
    /// Input column to resume from.
    pub input_index: Option<usize>,
    /// Output column to resume from.
    pub output_index: Option<usize>,
    /// Stop once this many columns have been emitted.
    pub length: Option<usize>,
}

impl ResampleOptions {
    pub fn width(width: usize) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn scale(scale: u32) -> Self {
        Self {
            scale: Some(scale),
            ..Self::default()
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_start_time(mut self, seconds: f64) -> Self {
        self.start_time = Some(seconds);
        self
    }

    pub fn resume_at(mut self, input_index: usize, output_index: usize) -> Self {
        self.input_index = Some(input_index);
        self.output_index = Some(output_index);
        self
    }

    /// Resolve the target samples per pixel for `source`.
    ///
    /// # Errors
    /// Returns [`WaveformError::InvalidOptions`] if neither a non-zero scale nor a
    /// non-zero width is given.
    pub fn target_scale<S: PeakSource + ?Sized>(&self, source: &S) -> Result<u32> {
        if let Some(scale) = self.scale.filter(|scale| *scale > 0) {
            return Ok(scale);
        }

        match self.width {
            Some(0) => Err(WaveformError::InvalidOptions(
                "width must be greater than zero".to_string(),
            )),
            Some(width) => {
                // duration * sample_rate == length * samples_per_pixel
                let total_samples =
                    source.length() as u64 * u64::from(source.samples_per_pixel());
                Ok(u32::try_from(total_samples / width as u64).unwrap_or(u32::MAX))
            }
            None => Err(WaveformError::InvalidOptions(
                "either width or scale must be set".to_string(),
            )),
        }
    }
}

/// A bare number is read as an output width.
impl From<usize> for ResampleOptions {
    fn from(width: usize) -> Self {
        Self::width(width)
    }
}

/// Running min/max for the output column being built.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    min: i32,
    max: i32,
}

impl Accumulator {
    /// Widest possible bounds, so any folded column replaces them.
    fn reset() -> Self {
        Self {
            min: PEAK_MAX,
            max: PEAK_MIN,
        }
    }

    fn fold(&mut self, min: i32, max: i32) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }
}

/// Resample `source` to a coarser scale by merging runs of input columns.
///
/// Output column `x` begins at original sample `x * target_scale`. Every input
/// column whose start falls before the next output boundary is folded into the
/// running min/max of the current output column. The result inherits the
/// source's version and sample rate.
///
/// # Errors
/// Returns [`WaveformError::Resolution`] if the target scale is finer than the
/// source's, and [`WaveformError::InvalidOptions`] if no target is given.
pub fn resample_source<S: PeakSource + ?Sized>(
    source: &S,
    options: &ResampleOptions,
) -> Result<RecordSource> {
    let target_scale = options.target_scale(source)?;
    let source_scale = source.samples_per_pixel();
    if target_scale < source_scale {
        return Err(WaveformError::Resolution {
            requested: target_scale,
            minimum: source_scale,
        });
    }

    let (mut input_index, mut output_index, emit_first) =
        walk_start(source, options, target_scale);
    let input_length = source.length();
    let target = u64::from(target_scale);
    let scale = u64::from(source_scale);
    let sample_at_pixel = |column: usize| column as u64 * target;
    let input_column_at = |column: usize| (sample_at_pixel(column) / scale) as usize;

    let mut acc = if input_index < input_length {
        Accumulator {
            min: source.peak_at(input_index * 2),
            max: source.peak_at(input_index * 2 + 1),
        }
    } else {
        Accumulator { min: 0, max: 0 }
    };

    let mut output: Vec<f64> = Vec::new();
    let mut emitted = 0_usize;
    let mut last_input_index: Option<usize> = None;
    // A boundary only closes a column once something was folded into it. The
    // seed counts only when resuming.
    let mut filled = emit_first;
    let cap_reached = |emitted: usize| options.length.is_some_and(|cap| emitted >= cap);

    while input_index < input_length {
        while input_column_at(output_index) <= input_index {
            if filled {
                output.push(f64::from(acc.min));
                output.push(f64::from(acc.max));
                emitted += 1;
            }
            last_input_index = Some(input_index);
            output_index += 1;
            if sample_at_pixel(output_index) != sample_at_pixel(output_index - 1) {
                acc = Accumulator::reset();
                filled = false;
            }
        }

        let stop = input_column_at(output_index).min(input_length);
        while input_index < stop {
            acc.fold(
                source.peak_at(input_index * 2),
                source.peak_at(input_index * 2 + 1),
            );
            input_index += 1;
            filled = true;
        }

        if cap_reached(emitted) {
            break;
        }
    }

    // The last folded run has not been emitted yet, unless the cap already stopped us.
    let pending = filled && last_input_index.is_some_and(|last| last != input_index);
    if pending && !cap_reached(emitted) {
        output.push(f64::from(acc.min));
        output.push(f64::from(acc.max));
        emitted += 1;
    }

    debug!(
        "resampled {} columns at scale {} into {} columns at scale {}",
        input_length, source_scale, emitted, target_scale
    );

    RecordSource::new(PeakRecord {
        version: source.version(),
        bits: 8,
        sample_rate: source.sample_rate(),
        samples_per_pixel: target_scale,
        length: emitted,
        data: output,
    })
}

/// Resolve where the walk begins and whether the seeded accumulator is emitted
/// as soon as the first boundary is crossed.
///
/// An explicit non-zero `output_index` resumes a previous walk, so its seed is
/// flushed like any finished column. A walk started at index 0 or from
/// `start_time` treats its first boundary as the opening of a fresh column.
/// Boundaries that fall at or before the starting input column are skipped by
/// the walk, so a lagging `output_index` never produces empty columns.
fn walk_start<S: PeakSource + ?Sized>(
    source: &S,
    options: &ResampleOptions,
    target_scale: u32,
) -> (usize, usize, bool) {
    if options.input_index.is_some() || options.output_index.is_some() {
        let output_index = options.output_index.unwrap_or(0);
        return (options.input_index.unwrap_or(0), output_index, output_index > 0);
    }

    match options.start_time.filter(|t| *t > 0.0) {
        Some(seconds) => {
            let samples = seconds * f64::from(source.sample_rate());
            let input_index = (samples / f64::from(source.samples_per_pixel())).floor() as usize;
            let output_index = (samples / f64::from(target_scale)).floor() as usize;
            (input_index, output_index, false)
        }
        None => (0, 0, false),
    }
}
