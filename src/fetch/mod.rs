//! Data-fetch layer: per-source gateway fetches merged into one collection.
//!
//! An "all sources" load issues one request per source, concurrently, so
//! that a single outage or hang degrades the view instead of blocking it,
//! and so no single response can grow unbounded. Results merge in
//! completion order; nothing downstream may assume source ordering.

mod worker;

pub use worker::{start_fetch_worker, FetchCommand, FetchUpdate};

use std::collections::BTreeMap;
use std::sync::mpsc;
use std::thread;

use tracing::warn;

use crate::api::GatewayClient;
use crate::domain::{BugRecord, DateRange, SourceFilter, SourceSystem};

/// Per-source accounting for a merged fetch. Used to detect
/// cross-contamination: a record whose `sourceSystem` disagrees with the
/// source it was fetched under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTally {
    /// Records kept, keyed by the source they were requested under.
    pub fetched: BTreeMap<SourceSystem, usize>,
    /// Records dropped because their source field disagreed with the
    /// request, keyed by the requested source.
    pub contaminated: BTreeMap<SourceSystem, usize>,
}

impl SourceTally {
    pub fn total_fetched(&self) -> usize {
        self.fetched.values().sum()
    }

    pub fn total_contaminated(&self) -> usize {
        self.contaminated.values().sum()
    }
}

/// The outcome of one merged fetch.
#[derive(Debug, Clone, Default)]
pub struct MergedFetch {
    pub records: Vec<BugRecord>,
    pub tally: SourceTally,
    /// Sources that failed, with the error text. The view renders what the
    /// other sources returned and shows these as a degraded-data notice.
    pub failures: Vec<(SourceSystem, String)>,
}

impl MergedFetch {
    /// True when every requested source failed and nothing was merged.
    pub fn is_total_failure(&self) -> bool {
        self.records.is_empty() && !self.failures.is_empty() && self.tally.total_fetched() == 0
    }
}

/// Fetch and merge records for the given selector.
///
/// The per-source requests go out concurrently, one scoped thread each, so
/// a source that hangs until its read timeout never delays the others.
/// Per-source failures are logged and recorded, not propagated; the merge
/// continues with whatever the remaining sources returned, in completion
/// order. Contaminated records are filtered out here so they can never
/// render under a wrong source label.
pub fn fetch_records(
    client: &GatewayClient,
    selector: SourceFilter,
    range: Option<&DateRange>,
) -> MergedFetch {
    let (result_tx, result_rx) = mpsc::channel();

    thread::scope(|scope| {
        for source in selector.sources() {
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                let outcome = client.records_by_source(source, range);
                let _ = result_tx.send((source, outcome));
            });
        }
        drop(result_tx);

        let mut merged = MergedFetch::default();
        for (source, outcome) in result_rx {
            match outcome {
                Ok(records) => {
                    let (kept, dropped) = screen_contamination(source, records);
                    merged.tally.fetched.insert(source, kept.len());
                    if dropped > 0 {
                        merged.tally.contaminated.insert(source, dropped);
                    }
                    merged.records.extend(kept);
                }
                Err(e) => {
                    warn!("Fetch for {} failed: {}", source.as_str(), e);
                    merged.failures.push((source, e.to_string()));
                }
            }
        }
        merged
    })
}

/// Split a single source's response into records that really belong to that
/// source and records carrying a different label. The mismatches are a
/// defect signal from ingestion; they are logged and dropped, never shown.
fn screen_contamination(
    requested: SourceSystem,
    records: Vec<BugRecord>,
) -> (Vec<BugRecord>, usize) {
    let mut kept = Vec::with_capacity(records.len());
    let mut dropped = 0;
    for record in records {
        if record.source_system == requested {
            kept.push(record);
        } else {
            warn!(
                "Cross-contamination: record {} fetched under {} but labeled {}",
                record.ticket_id,
                requested.as_str(),
                record.source_system.as_str()
            );
            dropped += 1;
        }
    }
    (kept, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticket: &str, source: SourceSystem) -> BugRecord {
        BugRecord {
            ticket_id: ticket.to_string(),
            source_system: source,
            ..Default::default()
        }
    }

    #[test]
    fn contamination_is_dropped_and_counted() {
        let records = vec![
            record("ZD-1", SourceSystem::Zendesk),
            record("SL-9", SourceSystem::Slack),
            record("ZD-2", SourceSystem::Zendesk),
        ];
        let (kept, dropped) = screen_contamination(SourceSystem::Zendesk, records);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.source_system == SourceSystem::Zendesk));
    }

    #[test]
    fn clean_response_passes_untouched() {
        let records = vec![
            record("SC-1", SourceSystem::Shortcut),
            record("SC-2", SourceSystem::Shortcut),
        ];
        let (kept, dropped) = screen_contamination(SourceSystem::Shortcut, records);
        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn tally_sums() {
        let mut tally = SourceTally::default();
        tally.fetched.insert(SourceSystem::Slack, 3);
        tally.fetched.insert(SourceSystem::Zendesk, 5);
        tally.contaminated.insert(SourceSystem::Zendesk, 1);
        assert_eq!(tally.total_fetched(), 8);
        assert_eq!(tally.total_contaminated(), 1);
    }

    #[test]
    fn total_failure_detection() {
        let merged = MergedFetch {
            failures: vec![(SourceSystem::Slack, "timeout".to_string())],
            ..Default::default()
        };
        assert!(merged.is_total_failure());

        let merged = MergedFetch {
            records: vec![record("ZD-1", SourceSystem::Zendesk)],
            tally: SourceTally {
                fetched: [(SourceSystem::Zendesk, 1)].into_iter().collect(),
                ..Default::default()
            },
            failures: vec![(SourceSystem::Slack, "timeout".to_string())],
        };
        assert!(!merged.is_total_failure());
    }
}
