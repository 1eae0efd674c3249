//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - synthesizer configuration and outcome (`SynthesisConfig`, `SynthesisOutcome`)
//! - object store transfer requests and reports (`TransferRequest`, `TransferReport`)
//! - cluster lifecycle types (`ClusterState`, `PollPolicy`, `ClusterTransition`)

pub mod types;

pub use types::*;
