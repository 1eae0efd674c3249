//! Warehouse cluster resume/pause with blocking status polling.
//!
//! Both operations are idempotent: a cluster already in the target state is
//! left alone and no mutation call is issued. Otherwise the mutation is
//! requested and the status is polled until it reports the target state or
//! the `PollPolicy` budget runs out. Every failure is turned into an
//! `EXIT_CLUSTER` error carrying the last observed state, so an orchestrator
//! halts instead of running queries against a cluster in an unknown state.

use std::fmt::Display;
use std::thread;

use tracing::{debug, info, warn};

use crate::domain::{ClusterState, ClusterTransition, PollPolicy};
use crate::error::{AppError, EXIT_CLUSTER};

pub mod http;

pub use http::HttpClusterApi;

/// Control-plane operations the controller needs.
pub trait ClusterApi {
    fn status(&self, cluster_id: &str) -> Result<ClusterState, AppError>;
    fn request_resume(&self, cluster_id: &str) -> Result<(), AppError>;
    fn request_pause(&self, cluster_id: &str) -> Result<(), AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Resume,
    Pause,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Resume => "resume",
            Action::Pause => "pause",
        }
    }

    fn target(self) -> ClusterState {
        match self {
            Action::Resume => ClusterState::Available,
            Action::Pause => ClusterState::Paused,
        }
    }

    /// The state a cluster reports while already heading to `target()`.
    fn in_flight(self) -> ClusterState {
        match self {
            Action::Resume => ClusterState::Resuming,
            Action::Pause => ClusterState::Pausing,
        }
    }

    fn request<A: ClusterApi + ?Sized>(self, api: &A, cluster_id: &str) -> Result<(), AppError> {
        match self {
            Action::Resume => api.request_resume(cluster_id),
            Action::Pause => api.request_pause(cluster_id),
        }
    }
}

/// Bring `cluster_id` to `available`, blocking until it gets there.
pub fn resume_cluster<A>(api: &A, cluster_id: &str, policy: &PollPolicy) -> Result<ClusterTransition, AppError>
where
    A: ClusterApi + ?Sized,
{
    transition(api, cluster_id, Action::Resume, policy)
}

/// Bring `cluster_id` to `paused`, blocking until it gets there.
pub fn pause_cluster<A>(api: &A, cluster_id: &str, policy: &PollPolicy) -> Result<ClusterTransition, AppError>
where
    A: ClusterApi + ?Sized,
{
    transition(api, cluster_id, Action::Pause, policy)
}

fn transition<A>(api: &A, cluster_id: &str, action: Action, policy: &PollPolicy) -> Result<ClusterTransition, AppError>
where
    A: ClusterApi + ?Sized,
{
    let target = action.target();
    let initial = api
        .status(cluster_id)
        .map_err(|e| fatal(cluster_id, action, None, e))?;

    if initial == target {
        info!(cluster = cluster_id, state = %initial, "cluster already in target state");
        return Ok(ClusterTransition {
            cluster_id: cluster_id.to_string(),
            from: initial,
            to: target,
            polls: 0,
        });
    }

    if initial == action.in_flight() {
        info!(cluster = cluster_id, state = %initial, "{} already in progress", action.verb());
    } else {
        action
            .request(api, cluster_id)
            .map_err(|e| fatal(cluster_id, action, Some(&initial), e))?;
        info!(cluster = cluster_id, from = %initial, "requested {}", action.verb());
    }

    let mut last = initial.clone();
    for poll in 1..=policy.max_polls {
        thread::sleep(policy.interval);
        last = api
            .status(cluster_id)
            .map_err(|e| fatal(cluster_id, action, Some(&last), e))?;
        debug!(cluster = cluster_id, poll, state = %last, "polled cluster status");

        if last == target {
            info!(cluster = cluster_id, polls = poll, "cluster reached {target}");
            return Ok(ClusterTransition {
                cluster_id: cluster_id.to_string(),
                from: initial,
                to: target,
                polls: poll,
            });
        }
    }

    Err(fatal(
        cluster_id,
        action,
        Some(&last),
        format!("`{target}` not reached after {} status polls", policy.max_polls),
    ))
}

fn fatal(cluster_id: &str, action: Action, last: Option<&ClusterState>, cause: impl Display) -> AppError {
    let state = last.map_or_else(|| "unknown".to_string(), ToString::to_string);
    warn!("Can't {}! Cluster {cluster_id} is in state: {state}.", action.verb());
    AppError::new(
        EXIT_CLUSTER,
        format!(
            "Cannot {} cluster {cluster_id} (last state: {state}): {cause}",
            action.verb()
        ),
    )
}
