//! Synthetic arrival timestamps for a static dataset.
//!
//! On the anchor weekday the rows of a CSV file are spread over the trailing
//! week (the seven days ending the day before `now`): a Gaussian number of
//! rows per day, and Gaussian-jittered arrival times within each day. The
//! result is written as a copy of the input with a leading `TimeReceived`
//! column. On every other weekday the call does nothing at all.
//!
//! Pipeline:
//! load CSV -> partition rows into day buckets -> per-day offsets ->
//! count check -> prepend column -> write CSV

use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use tracing::info;

use crate::domain::{SynthesisConfig, SynthesisOutcome};
use crate::error::AppError;
use crate::io::dataset::{load_dataset, write_dataset};

pub mod buckets;
pub mod sampler;

pub use buckets::{day_offsets, partition_rows, week_timestamps, window_start};
pub use sampler::{GaussianSource, RngGaussian};

/// Output format of the generated column (UTC wall clock, microseconds).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Attach synthetic timestamps to `source` and write the result to `destination`.
///
/// Returns `SynthesisOutcome::Skipped` without touching the filesystem when
/// `now` does not fall on `config.anchor_weekday`.
pub fn attach_timestamps<S>(
    source: &Path,
    destination: &Path,
    config: &SynthesisConfig,
    now: DateTime<Utc>,
    sampler: &mut S,
) -> Result<SynthesisOutcome, AppError>
where
    S: GaussianSource + ?Sized,
{
    let weekday = now.weekday();
    if weekday != config.anchor_weekday {
        info!(
            %weekday,
            anchor = %config.anchor_weekday,
            "not the anchor day, skipping timestamp synthesis"
        );
        return Ok(SynthesisOutcome::Skipped { weekday });
    }

    let mut dataset = load_dataset(source)?;
    if dataset.has_column(&config.column_name) {
        return Err(AppError::input(format!(
            "CSV '{}' already has a `{}` column.",
            source.display(),
            config.column_name
        )));
    }

    let n = dataset.len();
    let sizes = partition_rows(n, sampler)?;
    let start = window_start(now.date_naive())?;
    let timestamps = week_timestamps(start, &sizes, sampler)?;

    let assigned: usize = sizes.iter().sum();
    if assigned != n || timestamps.len() != n {
        return Err(AppError::invariant(format!(
            "Timestamp count mismatch: rows={n}, bucket total={assigned}, generated={}.",
            timestamps.len()
        )));
    }

    let column = timestamps
        .iter()
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .collect();
    dataset.prepend_column(&config.column_name, column)?;
    write_dataset(destination, &dataset)?;

    info!(
        rows = n,
        ?sizes,
        %start,
        destination = %destination.display(),
        "wrote timestamped dataset"
    );

    Ok(SynthesisOutcome::Written {
        rows: n,
        bucket_sizes: sizes,
        window_start: start,
    })
}
