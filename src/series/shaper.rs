//! Peak-shaping strategies that fill usage and denial values for a series.

use rand::Rng;
use rand::seq::index;
use tracing::{debug, warn};

use super::types::PeakEvent;

/// Denial runs last between 3 and 6 samples.
pub const RUN_LEN_MIN: usize = 3;
pub const RUN_LEN_MAX: usize = 6;
/// Per-sample denial count inside a run.
pub const DENIAL_MIN: u32 = 3;
pub const DENIAL_MAX: u32 = 5;
/// Samples after the second run that must stay below capacity.
pub const SUPPRESSION_LEN: usize = 10;

const FIRST_PEAK_MIN: usize = 5;
const FIRST_PEAK_MAX: usize = 8;
const PEAK_GAP_MIN: usize = 20;
const PEAK_GAP_MAX: usize = 29;
const RAMP_STEP_MIN: i64 = 5;
const RAMP_STEP_MAX: i64 = 40;
const BAND_HALF_WIDTH: i64 = 20;
const WALK_DELTA_MIN: i64 = -10;
const WALK_DELTA_MAX: i64 = 9;
/// Random peaks never start within the last six samples.
const RANDOM_PEAK_TAIL: usize = 6;
/// Random peak starts are at least this far apart, leaving six samples between them.
const RANDOM_PEAK_SPACING: usize = RUN_LEN_MAX + 1;

/// Usage and denial values produced by a shaper, before timestamps are attached.
#[derive(Debug, Clone)]
pub struct Shaped {
    pub usage: Vec<u32>,
    pub denial: Vec<u32>,
    pub peaks: [PeakEvent; 2],
}

/// Strategy that lays out usage, denials and peaks for a series of fixed length.
///
/// Implementations must keep `0 <= usage <= max_quantity` and leave denial at
/// zero outside the peak runs they report.
pub trait PeakShaper {
    /// Smallest series length the shaper supports.
    fn min_points(&self) -> usize;

    /// Fills `num_points` samples. Callers guarantee `num_points >= min_points()`
    /// and `max_quantity > 0`.
    fn shape<R: Rng + ?Sized>(&self, max_quantity: u32, num_points: usize, rng: &mut R) -> Shaped;
}

/// Ramp to a first peak, hold a plateau, peak again, then keep usage strictly
/// below capacity for [`SUPPRESSION_LEN`] samples before walking freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlledPeaks;

/// Two randomly placed peaks on top of a bounded random walk.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPeaks;

impl PeakShaper for ControlledPeaks {
    fn min_points(&self) -> usize {
        SUPPRESSION_LEN + RUN_LEN_MAX + 1
    }

    fn shape<R: Rng + ?Sized>(&self, max_quantity: u32, num_points: usize, rng: &mut R) -> Shaped {
        let n = num_points;
        let max = i64::from(max_quantity);
        let mut usage = vec![0_i64; n];
        let mut denial = vec![0_u32; n];

        let first_peak = rng.random_range(FIRST_PEAK_MIN..=FIRST_PEAK_MAX);
        let mut second_peak = first_peak + rng.random_range(PEAK_GAP_MIN..=PEAK_GAP_MAX);
        let latest = n - self.min_points();
        if second_peak > latest {
            // Later peak wins where the clamped run lands on the first one.
            let clamped = latest.max(first_peak);
            warn!(second_peak, clamped, num_points = n, "second peak clamped to fit suppression window");
            second_peak = clamped;
        }
        debug!(first_peak, second_peak, "controlled peaks placed");

        let mut current = 0_i64;
        for slot in usage.iter_mut().take(first_peak) {
            current = (current + rng.random_range(RAMP_STEP_MIN..=RAMP_STEP_MAX)).min(max);
            *slot = current;
        }

        let mid = max / 2;
        for slot in &mut usage[first_peak..second_peak] {
            *slot = (mid + rng.random_range(-BAND_HALF_WIDTH..=BAND_HALF_WIDTH)).clamp(0, max);
        }

        let first = apply_run(first_peak, max, &mut usage, &mut denial, rng);
        let second = apply_run(second_peak, max, &mut usage, &mut denial, rng);

        let run_end = second.end(n);
        let suppression_end = (run_end + SUPPRESSION_LEN).min(n);
        // Samples of a merged first run past the second run's end are walked too.
        for i in run_end..n {
            let ceiling = if i < suppression_end { max - 1 } else { max };
            usage[i] = walk_step(usage[i - 1], ceiling, rng);
            denial[i] = 0;
        }

        Shaped {
            usage: into_u32(usage),
            denial,
            peaks: [first, second],
        }
    }
}

impl PeakShaper for RandomPeaks {
    fn min_points(&self) -> usize {
        RANDOM_PEAK_TAIL + RANDOM_PEAK_SPACING + 1
    }

    fn shape<R: Rng + ?Sized>(&self, max_quantity: u32, num_points: usize, rng: &mut R) -> Shaped {
        let n = num_points;
        let max = i64::from(max_quantity);
        let mut usage = vec![0_i64; n];
        let mut denial = vec![0_u32; n];

        // Candidate starts are 1..=n-6. Drawing two distinct slots from a range
        // shortened by the spacing, then shifting the later one back out,
        // picks uniformly among pairs that keep the required gap.
        let candidates = n - RANDOM_PEAK_TAIL;
        let slots = candidates - (RANDOM_PEAK_SPACING - 1);
        let mut picked = index::sample(rng, slots, 2).into_vec();
        picked.sort_unstable();
        let first_peak = 1 + picked[0];
        let second_peak = 1 + picked[1] + (RANDOM_PEAK_SPACING - 1);
        debug!(first_peak, second_peak, "random peaks placed");

        let first = apply_run(first_peak, max, &mut usage, &mut denial, rng);
        let second = apply_run(second_peak, max, &mut usage, &mut denial, rng);

        let mut prev: Option<i64> = None;
        for i in 0..n {
            if denial[i] > 0 {
                prev = Some(usage[i]);
                continue;
            }
            let from = match prev {
                Some(p) => p,
                None => (max / 2 + rng.random_range(-BAND_HALF_WIDTH..=BAND_HALF_WIDTH)).clamp(0, max),
            };
            usage[i] = walk_step(from, max, rng);
            prev = Some(usage[i]);
        }

        Shaped {
            usage: into_u32(usage),
            denial,
            peaks: [first, second],
        }
    }
}

/// Forces a denial run of random length starting at `index`.
fn apply_run<R: Rng + ?Sized>(
    index: usize,
    max: i64,
    usage: &mut [i64],
    denial: &mut [u32],
    rng: &mut R,
) -> PeakEvent {
    let denial_duration = rng.random_range(RUN_LEN_MIN..=RUN_LEN_MAX);
    let end = (index + denial_duration).min(usage.len());
    for i in index..end {
        usage[i] = max;
        denial[i] = rng.random_range(DENIAL_MIN..=DENIAL_MAX);
    }
    PeakEvent {
        index,
        denial_duration,
    }
}

/// One bounded random-walk step from `prev`, clamped to `[0, ceiling]`.
fn walk_step<R: Rng + ?Sized>(prev: i64, ceiling: i64, rng: &mut R) -> i64 {
    (prev + rng.random_range(WALK_DELTA_MIN..=WALK_DELTA_MAX)).clamp(0, ceiling.max(0))
}

fn into_u32(values: Vec<i64>) -> Vec<u32> {
    values
        .into_iter()
        .map(|v| u32::try_from(v).unwrap_or(0))
        .collect()
}
