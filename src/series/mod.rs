//! Synthetic usage series: date grid, peak shaping and summaries.

/// Evenly spaced timestamp grid.
pub mod dates;
pub mod generator;
pub mod shaper;
/// Post-hoc series metrics.
pub mod summary;
pub mod types;

pub use generator::{SeriesGenerator, generate, generate_series};
pub use shaper::{ControlledPeaks, PeakShaper, RandomPeaks};
pub use summary::{PeakRun, SeriesSummary};
pub use types::{PeakEvent, Series, SeriesParams, SeriesPoint, SeriesVariant};
