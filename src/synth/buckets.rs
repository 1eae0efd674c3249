//! Day-bucket partitioning and intra-day arrival offsets.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::{SECONDS_PER_DAY, WINDOW_DAYS};
use crate::error::AppError;
use crate::synth::sampler::GaussianSource;

/// Subtracted from the last offset of a day so it never lands on the next midnight.
pub const END_OF_DAY_EPSILON: f64 = 1e-6;

/// Lower bound for a single drawn interval, as a fraction of the mean interval.
const MIN_INTERVAL_FRACTION: f64 = 1e-3;

const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Split `n` rows over the 7 day buckets.
///
/// Six sizes are drawn from `N(n/7, (n/70)²)` and rounded; the seventh is
/// whatever remains so the total is exactly `n`. Each drawn size is clamped to
/// `[0, remaining]`, which only binds for very small `n` or extreme draws.
pub fn partition_rows<S>(n: usize, sampler: &mut S) -> Result<Vec<usize>, AppError>
where
    S: GaussianSource + ?Sized,
{
    let mean = n as f64 / WINDOW_DAYS as f64;
    let std_dev = mean / 10.0;

    let draws = sampler.draw(mean, std_dev, WINDOW_DAYS - 1)?;
    if draws.len() != WINDOW_DAYS - 1 {
        return Err(AppError::invariant(format!(
            "Expected {} bucket-size draws, got {}.",
            WINDOW_DAYS - 1,
            draws.len()
        )));
    }

    let mut sizes = Vec::with_capacity(WINDOW_DAYS);
    let mut remaining = n;
    for draw in draws {
        let rounded = draw.round_ties_even();
        let size = if rounded.is_finite() && rounded > 0.0 {
            (rounded as usize).min(remaining)
        } else {
            0
        };
        remaining -= size;
        sizes.push(size);
    }
    sizes.push(remaining);

    Ok(sizes)
}

/// Cumulative arrival offsets (seconds since midnight) for one day bucket.
///
/// The result is strictly increasing and every value lies in `(0, 86400)`.
/// A bucket of size 0 yields no offsets and consumes no draws.
pub fn day_offsets<S>(size: usize, sampler: &mut S) -> Result<Vec<f64>, AppError>
where
    S: GaussianSource + ?Sized,
{
    if size == 0 {
        return Ok(Vec::new());
    }

    let mean = SECONDS_PER_DAY / size as f64;
    let draws = sampler.draw(mean, mean / 10.0, size)?;
    if draws.len() != size {
        return Err(AppError::invariant(format!(
            "Expected {size} interval draws, got {}.",
            draws.len()
        )));
    }

    let floor = mean * MIN_INTERVAL_FRACTION;
    let intervals: Vec<f64> = draws
        .into_iter()
        .map(|d| if d.is_finite() { d.max(floor) } else { mean })
        .collect();
    let total: f64 = intervals.iter().sum();

    let mut acc = 0.0;
    let mut offsets: Vec<f64> = intervals
        .iter()
        .map(|s| {
            acc += s * SECONDS_PER_DAY / total;
            acc
        })
        .collect();

    if let Some(last) = offsets.last_mut() {
        *last = last.min(SECONDS_PER_DAY) - END_OF_DAY_EPSILON;
    }

    Ok(offsets)
}

/// First day of the trailing week that ends the day before `anchor`.
pub fn window_start(anchor: NaiveDate) -> Result<NaiveDate, AppError> {
    anchor
        .checked_sub_days(Days::new(WINDOW_DAYS as u64))
        .ok_or_else(|| AppError::invariant(format!("Date underflow computing the week before {anchor}.")))
}

/// Timestamps for every bucket, oldest day first.
pub fn week_timestamps<S>(
    start: NaiveDate,
    sizes: &[usize],
    sampler: &mut S,
) -> Result<Vec<DateTime<Utc>>, AppError>
where
    S: GaussianSource + ?Sized,
{
    let mut out = Vec::with_capacity(sizes.iter().sum());

    for (day, &size) in sizes.iter().enumerate() {
        let date = start
            .checked_add_days(Days::new(day as u64))
            .ok_or_else(|| AppError::invariant(format!("Date overflow for bucket {day} after {start}.")))?;
        let midnight = date.and_time(NaiveTime::MIN).and_utc();

        let offsets = day_offsets(size, sampler)?;
        tracing::debug!(%date, size, "generated day bucket");

        out.extend(offsets.into_iter().map(|secs| midnight + offset_duration(secs)));
    }

    Ok(out)
}

/// Offset seconds → duration at microsecond resolution, kept inside the day.
fn offset_duration(secs: f64) -> Duration {
    let micros = (secs * 1e6).round() as i64;
    Duration::microseconds(micros.clamp(0, MICROS_PER_DAY - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::sampler::RngGaussian;
    use crate::synth::sampler::testing::{MeanSampler, ScriptedSampler};

    #[test]
    fn partition_uses_n_over_7_and_n_over_70() {
        let mut sampler = ScriptedSampler::new(vec![vec![98.6, 101.4, 100.5, 99.5, 97.0, 104.2]]);
        let sizes = partition_rows(700, &mut sampler).unwrap();

        assert_eq!(sampler.calls, vec![(100.0, 10.0, 6)]);
        // Ties round to even; the seventh bucket absorbs the remainder.
        assert_eq!(sizes, vec![99, 101, 100, 100, 97, 104, 99]);
        assert_eq!(sizes.iter().sum::<usize>(), 700);

        let mut sampler = ScriptedSampler::new(vec![vec![2.5; 6]]);
        assert_eq!(partition_rows(20, &mut sampler).unwrap(), vec![2, 2, 2, 2, 2, 2, 8]);
    }

    #[test]
    fn partition_clamps_negative_and_oversized_draws() {
        let mut sampler = ScriptedSampler::new(vec![vec![-2.0, 3.0, 9.0, 1.0, f64::NAN, 0.4]]);
        let sizes = partition_rows(5, &mut sampler).unwrap();
        assert_eq!(sizes, vec![0, 3, 2, 0, 0, 0, 0]);
        assert_eq!(sizes.iter().sum::<usize>(), 5);
    }

    #[test]
    fn partition_of_zero_rows_is_all_empty() {
        let sizes = partition_rows(0, &mut RngGaussian::seeded(9)).unwrap();
        assert_eq!(sizes, vec![0; WINDOW_DAYS]);
    }

    #[test]
    fn partition_large_n_sums_exactly() {
        let n = 165_053;
        let sizes = partition_rows(n, &mut RngGaussian::seeded(11)).unwrap();
        assert_eq!(sizes.len(), WINDOW_DAYS);
        assert_eq!(sizes.iter().sum::<usize>(), n);
        let mean = n as f64 / 7.0;
        for s in &sizes[..6] {
            // Six standard deviations is far outside any plausible draw.
            assert!((*s as f64 - mean).abs() < 6.0 * mean / 10.0, "size {s}");
        }
    }

    #[test]
    fn partition_rejects_short_draws() {
        let mut sampler = ScriptedSampler::new(vec![vec![1.0, 1.0]]);
        let err = partition_rows(7, &mut sampler).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INVARIANT);
    }

    #[test]
    fn single_row_day_lands_just_before_midnight() {
        let offsets = day_offsets(1, &mut MeanSampler).unwrap();
        assert_eq!(offsets.len(), 1);
        assert!((offsets[0] - (SECONDS_PER_DAY - END_OF_DAY_EPSILON)).abs() < 1e-9);
    }

    #[test]
    fn offsets_are_rescaled_and_increasing() {
        // Raw intervals sum to 40000; rescaled by 86400/40000.
        let mut sampler = ScriptedSampler::new(vec![vec![10_000.0, 20_000.0, 10_000.0]]);
        let offsets = day_offsets(3, &mut sampler).unwrap();
        assert_eq!(sampler.calls, vec![(28_800.0, 2_880.0, 3)]);
        assert!((offsets[0] - 21_600.0).abs() < 1e-9);
        assert!((offsets[1] - 64_800.0).abs() < 1e-9);
        assert!((offsets[2] - (86_400.0 - END_OF_DAY_EPSILON)).abs() < 1e-9);
    }

    #[test]
    fn offsets_from_random_draws_stay_inside_the_day() {
        let mut sampler = RngGaussian::seeded(5);
        for size in [1usize, 2, 17, 500, 24_000] {
            let offsets = day_offsets(size, &mut sampler).unwrap();
            assert_eq!(offsets.len(), size);
            assert!(offsets[0] > 0.0);
            assert!(offsets.windows(2).all(|w| w[0] < w[1]));
            assert!(*offsets.last().unwrap() < SECONDS_PER_DAY);
        }
    }

    #[test]
    fn non_positive_draws_are_floored() {
        let mut sampler = ScriptedSampler::new(vec![vec![-5.0, 43_200.0]]);
        let offsets = day_offsets(2, &mut sampler).unwrap();
        assert!(offsets[0] > 0.0);
        assert!(offsets[0] < offsets[1]);
    }

    #[test]
    fn empty_bucket_consumes_no_draws() {
        let mut sampler = ScriptedSampler::default();
        assert!(day_offsets(0, &mut sampler).unwrap().is_empty());
        assert!(sampler.calls.is_empty());
    }

    #[test]
    fn window_starts_seven_days_back() {
        let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            window_start(anchor).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
    }

    #[test]
    fn buckets_are_ordered_and_inside_their_day() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let sizes = vec![40, 0, 35, 51, 1, 44, 29];
        let stamps = week_timestamps(start, &sizes, &mut RngGaussian::seeded(21)).unwrap();
        assert_eq!(stamps.len(), sizes.iter().sum::<usize>());

        let mut idx = 0;
        for (day, size) in sizes.iter().enumerate() {
            let date = start.checked_add_days(Days::new(day as u64)).unwrap();
            let lo = date.and_time(NaiveTime::MIN).and_utc();
            let hi = lo + Duration::days(1);
            for ts in &stamps[idx..idx + size] {
                assert!(*ts >= lo && *ts < hi, "{ts} outside {date}");
            }
            idx += size;
        }
        // Chronological buckets + increasing offsets => globally increasing.
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }
}
