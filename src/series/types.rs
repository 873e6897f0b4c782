//! Core series types: generation parameters, samples and peak events.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Error, Result};

/// Default number of samples in a generated series.
pub const DEFAULT_NUM_POINTS: usize = 100;

/// Peak-shaping variant applied by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariant {
    /// Ramp, plateau, two spaced peaks, then a suppression window.
    Controlled,
    /// Two randomly placed peaks over a bounded random walk.
    RandomPeaks,
}

impl SeriesVariant {
    /// Available variant names, as accepted by [`SeriesVariant::from_name`].
    pub const NAMES: &[&str] = &["controlled", "random_peaks"];

    /// Looks up a variant by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "controlled" => Some(Self::Controlled),
            "random_peaks" => Some(Self::RandomPeaks),
            _ => None,
        }
    }

    /// Configuration name of the variant.
    pub fn name(self) -> &'static str {
        match self {
            Self::Controlled => "controlled",
            Self::RandomPeaks => "random_peaks",
        }
    }
}

/// Inputs to a single generation run.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use usage_synth::series::types::{SeriesParams, SeriesVariant};
///
/// let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// let params = SeriesParams::new(start, end, 100, 100);
/// assert_eq!(params.variant, SeriesVariant::Controlled);
/// assert!(params.validate(17).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SeriesParams {
    /// First timestamp (midnight of this date).
    pub start_date: NaiveDate,
    /// Last timestamp (midnight of this date, inclusive).
    pub end_date: NaiveDate,
    /// Capacity shared by every sample; usage never exceeds it.
    pub max_quantity: u32,
    /// Number of samples to produce.
    pub num_points: usize,
    /// Peak-shaping variant.
    pub variant: SeriesVariant,
}

impl SeriesParams {
    /// Creates controlled-variant parameters.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, max_quantity: u32, num_points: usize) -> Self {
        Self {
            start_date,
            end_date,
            max_quantity,
            num_points,
            variant: SeriesVariant::Controlled,
        }
    }

    /// Returns a copy using `variant` instead.
    pub fn with_variant(mut self, variant: SeriesVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Checks the date order, capacity and sample count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] describing the first violated constraint.
    pub fn validate(&self, min_points: usize) -> Result<()> {
        if self.start_date >= self.end_date {
            return Err(Error::InvalidParams(format!(
                "start date {} must be before end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.max_quantity == 0 {
            return Err(Error::InvalidParams("max quantity must be > 0".into()));
        }
        if self.num_points < min_points {
            return Err(Error::InvalidParams(format!(
                "{} variant needs at least {min_points} points, got {}",
                self.variant.name(),
                self.num_points
            )));
        }
        Ok(())
    }
}

/// One generated sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    /// Sample timestamp.
    pub date: NaiveDateTime,
    /// Maximum quantity, constant across the series.
    pub capacity: u32,
    /// Units in use, `0 <= usage <= capacity`.
    pub usage: u32,
    /// Rejected requests; non-zero only inside a peak run.
    pub denial_count: u32,
}

impl SeriesPoint {
    /// True when the sample belongs to a denial episode at full capacity.
    pub fn is_saturated_denial(&self) -> bool {
        self.usage == self.capacity && self.denial_count > 0
    }
}

impl fmt::Display for SeriesPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | usage={:>4}/{:<4} denial={}",
            self.date.format("%Y-%m-%d %H:%M"),
            self.usage,
            self.capacity,
            self.denial_count,
        )
    }
}

/// A peak applied to the series: `denial_duration` samples starting at `index`
/// are forced to capacity with a positive denial count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakEvent {
    /// Position of the first saturated sample.
    pub index: usize,
    /// Length of the denial run (3 to 6 samples).
    pub denial_duration: usize,
}

impl PeakEvent {
    /// Index one past the last sample of the run, bounded by `len`.
    pub fn end(&self, len: usize) -> usize {
        (self.index + self.denial_duration).min(len)
    }
}

/// A generated series together with the peaks that shaped it.
#[derive(Debug, Clone)]
pub struct Series {
    /// Samples in date order.
    pub points: Vec<SeriesPoint>,
    /// The two peak events, sorted by index.
    pub peaks: [PeakEvent; 2],
}
