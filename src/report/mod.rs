//! One-line, human-readable summaries printed by `batchctl` on success.

use crate::domain::{ClusterTransition, LocalCleanup, SynthesisOutcome, TransferReport};

pub fn format_synthesis(outcome: &SynthesisOutcome) -> String {
    match outcome {
        SynthesisOutcome::Skipped { weekday } => {
            format!("skipped: today is {weekday}, not the anchor day")
        }
        SynthesisOutcome::Written {
            rows,
            bucket_sizes,
            window_start,
        } => {
            let sizes = bucket_sizes
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join("/");
            format!("wrote {rows} rows over the week starting {window_start} (per day: {sizes})")
        }
    }
}

pub fn format_transfer(report: &TransferReport) -> String {
    let local = match &report.local {
        LocalCleanup::Kept => "local copy kept".to_string(),
        LocalCleanup::Removed => "local copy removed".to_string(),
        LocalCleanup::AlreadyAbsent => "local copy was already gone".to_string(),
        LocalCleanup::Failed(e) => format!("WARNING: local copy not removed: {e}"),
    };
    format!(
        "uploaded {} bytes to {}/{}; {local}",
        report.bytes, report.bucket, report.key
    )
}

pub fn format_transition(t: &ClusterTransition) -> String {
    if t.was_noop() {
        format!("cluster {} already {}", t.cluster_id, t.to)
    } else {
        format!(
            "cluster {}: {} -> {} after {} status polls",
            t.cluster_id, t.from, t.to, t.polls
        )
    }
}
