//! `batch-helpers` library crate.
//!
//! The binary (`batchctl`) is a thin wrapper around this library so that:
//!
//! - every helper is testable without spawning processes
//! - an orchestrator written in Rust can call the helpers directly
//! - the external services sit behind traits (`ObjectStore`, `ClusterApi`)

pub mod app;
pub mod cli;
pub mod cluster;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod store;
pub mod synth;
