//! Series generator: timestamps plus a peak shaper, producing [`Series`].

use chrono::NaiveDate;
use rand::Rng;
use tracing::info;

use super::dates::even_timestamps;
use super::shaper::{ControlledPeaks, PeakShaper, RandomPeaks};
use super::types::{Series, SeriesParams, SeriesPoint, SeriesVariant};
use crate::error::Result;

/// Generator bound to one set of parameters and a peak-shaping strategy.
///
/// Generic over `S: PeakShaper` for static dispatch.
#[derive(Debug, Clone)]
pub struct SeriesGenerator<S: PeakShaper> {
    params: SeriesParams,
    shaper: S,
}

impl<S: PeakShaper> SeriesGenerator<S> {
    /// Creates a generator after validating `params` against the shaper's
    /// minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::InvalidParams`] for reversed dates, zero
    /// capacity or too few points.
    pub fn new(params: SeriesParams, shaper: S) -> Result<Self> {
        params.validate(shaper.min_points())?;
        Ok(Self { params, shaper })
    }

    /// Parameters this generator was built with.
    pub fn params(&self) -> &SeriesParams {
        &self.params
    }

    /// Produces one series using randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Returns an error only if the date span cannot be subdivided.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Series> {
        let p = &self.params;
        let stamps = even_timestamps(p.start_date, p.end_date, p.num_points)?;
        let shaped = self.shaper.shape(p.max_quantity, p.num_points, rng);

        let points: Vec<SeriesPoint> = stamps
            .into_iter()
            .zip(shaped.usage)
            .zip(shaped.denial)
            .map(|((date, usage), denial_count)| SeriesPoint {
                date,
                capacity: p.max_quantity,
                usage,
                denial_count,
            })
            .collect();

        info!(
            variant = p.variant.name(),
            points = points.len(),
            first_peak = shaped.peaks[0].index,
            second_peak = shaped.peaks[1].index,
            "series generated"
        );

        Ok(Series {
            points,
            peaks: shaped.peaks,
        })
    }
}

/// Generates a series with the shaper selected by `params.variant`.
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidParams`] if the parameters are invalid
/// for the chosen variant.
pub fn generate_series<R: Rng + ?Sized>(params: &SeriesParams, rng: &mut R) -> Result<Series> {
    match params.variant {
        SeriesVariant::Controlled => SeriesGenerator::new(params.clone(), ControlledPeaks)?.generate(rng),
        SeriesVariant::RandomPeaks => SeriesGenerator::new(params.clone(), RandomPeaks)?.generate(rng),
    }
}

/// Generates a controlled-variant series and returns only its points.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use rand::{SeedableRng, rngs::StdRng};
/// use usage_synth::series::generate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let points = generate(start, end, 100, 100, &mut rng).unwrap();
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| p.usage <= 100));
/// ```
///
/// # Errors
///
/// Returns [`crate::error::Error::InvalidParams`] if `start_date >= end_date`,
/// `max_quantity == 0` or `num_points < 17`.
pub fn generate<R: Rng + ?Sized>(
    start_date: NaiveDate,
    end_date: NaiveDate,
    max_quantity: u32,
    num_points: usize,
    rng: &mut R,
) -> Result<Vec<SeriesPoint>> {
    let params = SeriesParams::new(start_date, end_date, max_quantity, num_points);
    generate_series(&params, rng).map(|series| series.points)
}
