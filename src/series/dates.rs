use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{Error, Result};

/// Builds `count` timestamps evenly spaced from `start` to `end` inclusive.
///
/// Spacing is computed at nanosecond resolution, so consecutive gaps differ by
/// at most one nanosecond when the span does not divide evenly.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use usage_synth::series::dates::even_timestamps;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// let stamps = even_timestamps(start, end, 5).unwrap();
/// assert_eq!(stamps.len(), 5);
/// assert_eq!(stamps[4].date(), end);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidParams`] if `count` is zero or the span overflows
/// nanosecond arithmetic.
pub fn even_timestamps(start: NaiveDate, end: NaiveDate, count: usize) -> Result<Vec<NaiveDateTime>> {
    if count == 0 {
        return Err(Error::InvalidParams("point count must be > 0".into()));
    }

    let start = start.and_time(NaiveTime::MIN);
    let end = end.and_time(NaiveTime::MIN);
    if count == 1 {
        return Ok(vec![start]);
    }

    let span_ns = (end - start)
        .num_nanoseconds()
        .ok_or_else(|| Error::InvalidParams("date span is too large".into()))?;
    let intervals = (count - 1) as i128;

    let stamps = (0..count)
        .map(|i| {
            let offset = (i128::from(span_ns) * i as i128 / intervals) as i64;
            start + TimeDelta::nanoseconds(offset)
        })
        .collect();
    Ok(stamps)
}

/// True when every timestamp falls exactly on midnight.
pub fn all_midnight(stamps: impl IntoIterator<Item = NaiveDateTime>) -> bool {
    stamps.into_iter().all(|t| t.time() == NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn endpoints_are_inclusive() {
        let stamps = even_timestamps(date(2024, 11, 1), date(2024, 12, 30), 100).unwrap();
        assert_eq!(stamps.len(), 100);
        assert_eq!(stamps[0], date(2024, 11, 1).and_time(NaiveTime::MIN));
        assert_eq!(stamps[99], date(2024, 12, 30).and_time(NaiveTime::MIN));
    }

    #[test]
    fn gaps_differ_by_at_most_one_nanosecond() {
        let stamps = even_timestamps(date(2024, 11, 1), date(2024, 12, 30), 100).unwrap();
        let gaps: Vec<i64> = stamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_nanoseconds().unwrap())
            .collect();
        let min = *gaps.iter().min().unwrap();
        let max = *gaps.iter().max().unwrap();
        assert!(min > 0);
        assert!(max - min <= 1, "gaps ranged {min}..{max}");
    }

    #[test]
    fn daily_grid_stays_on_midnight() {
        let stamps = even_timestamps(date(2024, 1, 1), date(2024, 1, 31), 31).unwrap();
        assert!(all_midnight(stamps.iter().copied()));
        assert_eq!(stamps[1].date(), date(2024, 1, 2));
    }

    #[test]
    fn uneven_grid_carries_time_of_day() {
        let stamps = even_timestamps(date(2024, 11, 1), date(2024, 12, 30), 100).unwrap();
        assert!(!all_midnight(stamps.iter().copied()));
    }

    #[test]
    fn single_point_is_start() {
        let stamps = even_timestamps(date(2024, 1, 1), date(2024, 2, 1), 1).unwrap();
        assert_eq!(stamps, vec![date(2024, 1, 1).and_time(NaiveTime::MIN)]);
    }

    #[test]
    fn zero_points_is_rejected() {
        assert!(even_timestamps(date(2024, 1, 1), date(2024, 2, 1), 0).is_err());
    }
}
