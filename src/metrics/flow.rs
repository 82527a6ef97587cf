//! Cross-source flow metrics: how reports become work items.

use crate::domain::BugRecord;

/// Conversion and connection figures between the upstream report sources
/// (Slack, Zendesk) and the downstream tracker (Shortcut).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowMetrics {
    /// Reports received: Slack messages + Zendesk tickets.
    pub upstream_count: u64,
    /// Work items created: Shortcut stories.
    pub downstream_count: u64,
}

impl FlowMetrics {
    /// Downstream over upstream. Zero upstream yields 0.0, never NaN.
    pub fn conversion_rate(&self) -> f64 {
        if self.upstream_count == 0 {
            0.0
        } else {
            self.downstream_count as f64 / self.upstream_count as f64
        }
    }

    /// Conversion rate as a display percentage.
    pub fn conversion_percent(&self) -> f64 {
        self.conversion_rate() * 100.0
    }

    /// Tickets assumed linked across the flow.
    ///
    /// Approximation: min(downstream, upstream). There is no link-tracking
    /// data to join on, so this is an upper bound on real connections, not
    /// a precise count.
    pub fn connected(&self) -> u64 {
        self.downstream_count.min(self.upstream_count)
    }
}

/// Count flow metrics over the loaded record set. Records from an unknown
/// source belong to neither side and are ignored.
pub fn flow_metrics(records: &[BugRecord]) -> FlowMetrics {
    let mut metrics = FlowMetrics::default();
    for record in records {
        if record.source_system.is_upstream() {
            metrics.upstream_count += 1;
        } else if record.source_system.is_downstream() {
            metrics.downstream_count += 1;
        }
    }
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceSystem;

    fn record(source: SourceSystem) -> BugRecord {
        BugRecord {
            source_system: source,
            ..Default::default()
        }
    }

    #[test]
    fn counts_split_by_role() {
        let records = vec![
            record(SourceSystem::Slack),
            record(SourceSystem::Slack),
            record(SourceSystem::Zendesk),
            record(SourceSystem::Shortcut),
            record(SourceSystem::Unknown),
        ];
        let metrics = flow_metrics(&records);
        assert_eq!(metrics.upstream_count, 3);
        assert_eq!(metrics.downstream_count, 1);
    }

    #[test]
    fn zero_upstream_yields_zero_not_nan() {
        let metrics = FlowMetrics {
            upstream_count: 0,
            downstream_count: 4,
        };
        assert_eq!(metrics.conversion_rate(), 0.0);
        assert_eq!(metrics.conversion_percent(), 0.0);
        assert!(!metrics.conversion_rate().is_nan());
    }

    #[test]
    fn conversion_and_connected() {
        let metrics = FlowMetrics {
            upstream_count: 8,
            downstream_count: 2,
        };
        assert!((metrics.conversion_rate() - 0.25).abs() < 1e-9);
        assert_eq!(metrics.connected(), 2);

        let inverted = FlowMetrics {
            upstream_count: 2,
            downstream_count: 8,
        };
        assert_eq!(inverted.connected(), 2);
    }
}
