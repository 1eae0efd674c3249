//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - builds the concrete object store / control-plane adapters
//! - runs the requested helper and prints a one-line summary

use std::time::Duration;

use chrono::Utc;
use clap::Parser;

use crate::cli::{AttachArgs, ClusterArgs, Command, UploadArgs};
use crate::cluster::{ClusterApi, HttpClusterApi, pause_cluster, resume_cluster};
use crate::domain::{PollPolicy, SynthesisConfig, SynthesisOutcome, TransferReport, TransferRequest};
use crate::error::AppError;
use crate::store::{LocalObjectStore, ObjectStore, S3ObjectStore, upload_file};
use crate::synth::{RngGaussian, attach_timestamps};

/// Entry point for the `batchctl` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.log_level.as_deref())?;

    match cli.command {
        Command::AttachTimestamps(args) => {
            let outcome = handle_attach(&args)?;
            println!("{}", crate::report::format_synthesis(&outcome));
        }
        Command::Upload(args) => {
            let report = handle_upload(&args)?;
            println!("{}", crate::report::format_transfer(&report));
        }
        Command::Resume(args) => handle_cluster(&args, ClusterAction::Resume)?,
        Command::Pause(args) => handle_cluster(&args, ClusterAction::Pause)?,
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClusterAction {
    Resume,
    Pause,
}

pub fn synthesis_config_from_args(args: &AttachArgs) -> SynthesisConfig {
    SynthesisConfig {
        anchor_weekday: args.anchor.weekday(),
        ..SynthesisConfig::default()
    }
}

pub fn handle_attach(args: &AttachArgs) -> Result<SynthesisOutcome, AppError> {
    let config = synthesis_config_from_args(args);
    let now = args.now.unwrap_or_else(Utc::now);
    let mut sampler = match args.seed {
        Some(seed) => RngGaussian::seeded(seed),
        None => RngGaussian::from_entropy(),
    };
    attach_timestamps(&args.source, &args.dest, &config, now, &mut sampler)
}

pub fn transfer_request_from_args(args: &UploadArgs) -> TransferRequest {
    TransferRequest::new(&args.bucket, &args.key, &args.file)
        .overwrite(!args.no_overwrite)
        .remove_local(args.remove_local)
}

pub fn handle_upload(args: &UploadArgs) -> Result<TransferReport, AppError> {
    let store: Box<dyn ObjectStore> = match &args.local_root {
        Some(root) => Box::new(LocalObjectStore::new(root)?),
        None => Box::new(S3ObjectStore::from_env()?),
    };
    upload_file(store.as_ref(), &transfer_request_from_args(args))
}

pub fn poll_policy_from_args(args: &ClusterArgs) -> PollPolicy {
    PollPolicy::new(Duration::from_secs(args.poll_interval_secs), args.max_polls)
}

fn handle_cluster(args: &ClusterArgs, action: ClusterAction) -> Result<(), AppError> {
    let api = HttpClusterApi::from_env()?;
    run_cluster_action(&api, args, action)
}

fn run_cluster_action(api: &dyn ClusterApi, args: &ClusterArgs, action: ClusterAction) -> Result<(), AppError> {
    let policy = poll_policy_from_args(args);
    let transition = match action {
        ClusterAction::Resume => resume_cluster(api, &args.cluster, &policy)?,
        ClusterAction::Pause => pause_cluster(api, &args.cluster, &policy)?,
    };
    println!("{}", crate::report::format_transition(&transition));
    Ok(())
}
