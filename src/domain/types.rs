//! Shared domain types.
//!
//! These types are plain data: they describe *what* an operation should do
//! (configuration, requests) and *what happened* (outcomes, reports) so the
//! CLI layer can log or print them without knowing the internals.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{NaiveDate, Weekday};
use clap::ValueEnum;

/// Number of day buckets in the trailing window.
pub const WINDOW_DAYS: usize = 7;

/// Seconds in one day bucket.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Name of the column prepended by the synthesizer.
pub const TIME_RECEIVED_COLUMN: &str = "TimeReceived";

/// Weekday selector for the CLI.
///
/// `chrono::Weekday` does not implement `ValueEnum`, so we mirror it here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnchorDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl AnchorDay {
    pub fn weekday(self) -> Weekday {
        match self {
            AnchorDay::Monday => Weekday::Mon,
            AnchorDay::Tuesday => Weekday::Tue,
            AnchorDay::Wednesday => Weekday::Wed,
            AnchorDay::Thursday => Weekday::Thu,
            AnchorDay::Friday => Weekday::Fri,
            AnchorDay::Saturday => Weekday::Sat,
            AnchorDay::Sunday => Weekday::Sun,
        }
    }
}

/// Synthesizer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisConfig {
    /// The only weekday on which timestamps are generated.
    pub anchor_weekday: Weekday,
    /// Header of the prepended column.
    pub column_name: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            anchor_weekday: Weekday::Mon,
            column_name: TIME_RECEIVED_COLUMN.to_string(),
        }
    }
}

/// Result of a synthesizer invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutcome {
    /// Not the anchor day; no file was read or written.
    Skipped { weekday: Weekday },
    /// The augmented dataset was written to the destination.
    Written {
        rows: usize,
        /// Row count per day bucket, oldest day first.
        bucket_sizes: Vec<usize>,
        /// Calendar date of the oldest bucket.
        window_start: NaiveDate,
    },
}

/// Lifecycle state reported by the warehouse control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterState {
    Available,
    Paused,
    Resuming,
    Pausing,
    /// Any state string this crate does not model explicitly.
    Other(String),
}

impl ClusterState {
    /// Parse a control-plane state string (case-insensitive).
    pub fn parse(raw: &str) -> Self {
        let norm = raw.trim().to_ascii_lowercase();
        match norm.as_str() {
            "available" => ClusterState::Available,
            "paused" => ClusterState::Paused,
            "resuming" => ClusterState::Resuming,
            "pausing" => ClusterState::Pausing,
            _ => ClusterState::Other(norm),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClusterState::Available => "available",
            ClusterState::Paused => "paused",
            ClusterState::Resuming => "resuming",
            ClusterState::Pausing => "pausing",
            ClusterState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ClusterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long to wait for a cluster to reach its target state.
///
/// There is deliberately no `Default`: callers must choose a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Maximum number of status reads after the mutation call.
    pub max_polls: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Self { interval, max_polls }
    }
}

/// Result of a successful resume/pause call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTransition {
    pub cluster_id: String,
    pub from: ClusterState,
    pub to: ClusterState,
    /// Status reads performed after the mutation call (0 when already there).
    pub polls: u32,
}

impl ClusterTransition {
    pub fn was_noop(&self) -> bool {
        self.from == self.to && self.polls == 0
    }
}

/// One file to push to the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub bucket: String,
    pub key: String,
    pub local_path: PathBuf,
    pub overwrite: bool,
    /// Delete the local file once the upload has succeeded.
    pub remove_local: bool,
}

impl TransferRequest {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            local_path: local_path.into(),
            overwrite: true,
            remove_local: false,
        }
    }

    pub fn remove_local(mut self, remove: bool) -> Self {
        self.remove_local = remove;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// What happened to the local copy after an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalCleanup {
    /// Removal was not requested.
    Kept,
    Removed,
    /// Removal was requested but the file was already gone.
    AlreadyAbsent,
    /// Removal was requested and failed. The upload itself succeeded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub bucket: String,
    pub key: String,
    pub bytes: u64,
    pub local: LocalCleanup,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_state_parses_case_insensitively() {
        assert_eq!(ClusterState::parse("Available"), ClusterState::Available);
        assert_eq!(ClusterState::parse(" PAUSED "), ClusterState::Paused);
        assert_eq!(
            ClusterState::parse("Modifying"),
            ClusterState::Other("modifying".to_string())
        );
        assert_eq!(ClusterState::Resuming.to_string(), "resuming");
    }

    #[test]
    fn anchor_day_maps_to_weekday() {
        assert_eq!(AnchorDay::Monday.weekday(), Weekday::Mon);
        assert_eq!(AnchorDay::Sunday.weekday(), Weekday::Sun);
        assert_eq!(SynthesisConfig::default().anchor_weekday, Weekday::Mon);
    }
}
