//! Post-hoc metrics computed from a finished series.

use std::fmt;

use super::types::SeriesPoint;

/// A maximal run of samples at capacity with a positive denial count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakRun {
    /// Index of the first sample in the run.
    pub start: usize,
    /// Number of samples in the run.
    pub len: usize,
    /// Denials summed over the run.
    pub denials: u64,
}

impl PeakRun {
    /// Index one past the last sample of the run.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Aggregate metrics for a series.
///
/// Computed from the points alone so a reloaded file reports the same figures
/// as the run that wrote it.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    /// Number of samples.
    pub points: usize,
    /// Capacity of the series (0 when empty).
    pub capacity: u32,
    /// Maximal saturated-denial runs in date order.
    pub peak_runs: Vec<PeakRun>,
    /// Sum of all denial counts.
    pub total_denials: u64,
    /// Highest usage observed.
    pub peak_usage: u32,
    /// Mean usage.
    pub mean_usage: f64,
    /// Samples with usage at capacity, with or without denials.
    pub saturated_samples: usize,
}

impl SeriesSummary {
    /// Computes all metrics from the complete point vector.
    pub fn from_points(points: &[SeriesPoint]) -> Self {
        let mut peak_runs: Vec<PeakRun> = Vec::new();
        let mut open: Option<PeakRun> = None;
        let mut total_denials = 0_u64;
        let mut peak_usage = 0_u32;
        let mut usage_sum = 0_u64;
        let mut saturated = 0_usize;

        for (i, p) in points.iter().enumerate() {
            total_denials += u64::from(p.denial_count);
            peak_usage = peak_usage.max(p.usage);
            usage_sum += u64::from(p.usage);
            if p.usage == p.capacity {
                saturated += 1;
            }

            if p.is_saturated_denial() {
                let run = open.get_or_insert(PeakRun {
                    start: i,
                    len: 0,
                    denials: 0,
                });
                run.len += 1;
                run.denials += u64::from(p.denial_count);
            } else if let Some(run) = open.take() {
                peak_runs.push(run);
            }
        }
        if let Some(run) = open {
            peak_runs.push(run);
        }

        let mean_usage = if points.is_empty() {
            0.0
        } else {
            usage_sum as f64 / points.len() as f64
        };

        Self {
            points: points.len(),
            capacity: points.first().map_or(0, |p| p.capacity),
            peak_runs,
            total_denials,
            peak_usage,
            mean_usage,
            saturated_samples: saturated,
        }
    }

    /// Largest usage in the `window` samples after the last peak run, if any.
    pub fn max_usage_after_last_run(&self, points: &[SeriesPoint], window: usize) -> Option<u32> {
        let run = self.peak_runs.last()?;
        points
            .iter()
            .skip(run.end())
            .take(window)
            .map(|p| p.usage)
            .max()
    }
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Series Summary ---")?;
        writeln!(f, "Points:                {}", self.points)?;
        writeln!(f, "Capacity:              {}", self.capacity)?;
        writeln!(f, "Peak runs:             {}", self.peak_runs.len())?;
        for run in &self.peak_runs {
            writeln!(
                f,
                "  run @ {:>3}: {} samples, {} denials",
                run.start, run.len, run.denials
            )?;
        }
        writeln!(f, "Total denials:         {}", self.total_denials)?;
        writeln!(f, "Peak usage:            {}", self.peak_usage)?;
        writeln!(f, "Mean usage:            {:.1}", self.mean_usage)?;
        write!(f, "Saturated samples:     {}", self.saturated_samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_points(values: &[(u32, u32)]) -> Vec<SeriesPoint> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &(usage, denial_count))| SeriesPoint {
                date: base + chrono::TimeDelta::days(i as i64),
                capacity: 10,
                usage,
                denial_count,
            })
            .collect()
    }

    #[test]
    fn finds_maximal_runs() {
        let points = make_points(&[
            (5, 0),
            (10, 3),
            (10, 4),
            (10, 0),
            (9, 0),
            (10, 5),
            (10, 5),
            (10, 3),
        ]);
        let summary = SeriesSummary::from_points(&points);
        assert_eq!(
            summary.peak_runs,
            vec![
                PeakRun { start: 1, len: 2, denials: 7 },
                PeakRun { start: 5, len: 3, denials: 13 },
            ]
        );
        assert_eq!(summary.total_denials, 20);
        assert_eq!(summary.saturated_samples, 6);
        assert_eq!(summary.peak_usage, 10);
    }

    #[test]
    fn window_after_last_run() {
        let points = make_points(&[(10, 3), (10, 3), (10, 3), (4, 0), (9, 0), (10, 0)]);
        let summary = SeriesSummary::from_points(&points);
        assert_eq!(summary.max_usage_after_last_run(&points, 2), Some(9));
        assert_eq!(summary.max_usage_after_last_run(&points, 10), Some(10));
    }

    #[test]
    fn denial_totals_do_not_overflow() {
        let points: Vec<SeriesPoint> = make_points(&[(10, 0), (10, 0)])
            .into_iter()
            .map(|p| SeriesPoint {
                denial_count: u32::MAX,
                ..p
            })
            .collect();
        let summary = SeriesSummary::from_points(&points);
        let expected = 2 * u64::from(u32::MAX);
        assert_eq!(summary.total_denials, expected);
        assert_eq!(summary.peak_runs, vec![PeakRun { start: 0, len: 2, denials: expected }]);
        assert!(format!("{summary}").contains(&format!("Total denials:         {expected}")));
    }

    #[test]
    fn mean_usage() {
        let points = make_points(&[(2, 0), (4, 0), (6, 0)]);
        let summary = SeriesSummary::from_points(&points);
        assert!((summary.mean_usage - 4.0).abs() < 1e-9);
    }

    #[test]
    fn empty_series() {
        let summary = SeriesSummary::from_points(&[]);
        assert_eq!(summary.points, 0);
        assert!(summary.peak_runs.is_empty());
        assert_eq!(summary.mean_usage, 0.0);
        assert!(format!("{summary}").contains("Peak runs:             0"));
    }
}
