//! Command-line parsing for `batchctl`.
//!
//! Each subcommand maps onto one library operation so an external scheduler
//! can call the helpers as plain processes and branch on the exit code.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

use crate::domain::AnchorDay;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "batchctl", version, about = "Weekly batch pipeline helpers")]
pub struct Cli {
    /// Log filter (`RUST_LOG` syntax). `RUST_LOG` wins when set.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// On the anchor weekday, write a copy of a CSV with a synthetic `TimeReceived` column.
    AttachTimestamps(AttachArgs),
    /// Upload a local file to an object store bucket.
    Upload(UploadArgs),
    /// Resume a warehouse cluster and wait until it is available.
    Resume(ClusterArgs),
    /// Pause a warehouse cluster and wait until it is paused.
    Pause(ClusterArgs),
}

#[derive(Debug, Args, Clone)]
pub struct AttachArgs {
    /// Input CSV (header row required).
    #[arg(long, value_name = "CSV")]
    pub source: PathBuf,

    /// Output CSV.
    #[arg(long, value_name = "CSV")]
    pub dest: PathBuf,

    /// Seed for reproducible output. Without it every run differs.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Weekday on which timestamps are generated.
    #[arg(long, value_enum, default_value_t = AnchorDay::Monday)]
    pub anchor: AnchorDay,

    /// Override the current time (RFC 3339), e.g. for backfills.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Args, Clone)]
pub struct UploadArgs {
    #[arg(long)]
    pub bucket: String,

    /// Object key inside the bucket.
    #[arg(long)]
    pub key: String,

    /// Local file to upload.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Delete the local file after a successful upload.
    #[arg(long)]
    pub remove_local: bool,

    /// Fail instead of replacing an existing object.
    #[arg(long)]
    pub no_overwrite: bool,

    /// Use a directory as the object store instead of S3 (configured from `AWS_*`).
    #[arg(long, value_name = "DIR")]
    pub local_root: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ClusterArgs {
    /// Cluster identifier.
    #[arg(long)]
    pub cluster: String,

    /// Seconds between status polls.
    #[arg(long, default_value_t = 1)]
    pub poll_interval_secs: u64,

    /// Give up after this many status polls.
    #[arg(long, default_value_t = 600)]
    pub max_polls: u32,
}
