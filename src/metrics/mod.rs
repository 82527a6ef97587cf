//! Derived metrics over the loaded record set.
//!
//! Everything here is computed from already-fetched data and never written
//! back. Every ratio checks its denominator; missing inputs degrade to
//! zeros or exclusions, never to a panic.

mod flow;
mod resolution;

pub use flow::{flow_metrics, FlowMetrics};
pub use resolution::{
    completion_hours, is_completed, resolution_stats, ElapsedBucket, ElapsedSummary,
    ResolutionDistribution, ResolutionStats,
};

use crate::api::SummaryCounts;
use crate::domain::BugRecord;

/// Aggregate counts computed locally from loaded records. Same shape as the
/// gateway's `summary` response, which makes it usable as a cross-check.
/// Records missing priority or state count under "Unknown"; they are never
/// dropped from the breakdowns.
pub fn summary_counts(records: &[BugRecord]) -> SummaryCounts {
    let mut summary = SummaryCounts {
        total: records.len() as u64,
        ..Default::default()
    };
    for record in records {
        *summary
            .by_priority
            .entry(record.priority_label().to_string())
            .or_insert(0) += 1;
        *summary
            .by_state
            .entry(record.workflow_state().to_string())
            .or_insert(0) += 1;
        *summary
            .by_source
            .entry(record.source_system.as_str().to_string())
            .or_insert(0) += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceSystem;

    #[test]
    fn missing_priority_counts_as_unknown() {
        let records = vec![
            BugRecord {
                priority: Some("High".to_string()),
                source_system: SourceSystem::Zendesk,
                ..Default::default()
            },
            BugRecord {
                source_system: SourceSystem::Slack,
                ..Default::default()
            },
            BugRecord {
                priority: Some("".to_string()),
                source_system: SourceSystem::Slack,
                ..Default::default()
            },
        ];
        let summary = summary_counts(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_priority["High"], 1);
        // Absent and blank both land in Unknown rather than disappearing.
        assert_eq!(summary.by_priority["Unknown"], 2);
        assert_eq!(summary.by_source["slack"], 2);
    }

    #[test]
    fn empty_set_is_all_zeros() {
        let summary = summary_counts(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_priority.is_empty());
    }
}
