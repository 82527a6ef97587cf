//! Filter/search engine over the merged record set.
//!
//! Filtering is a pure function of (records, filters): every active
//! predicate must hold for a record to pass, and the output is always a
//! subset of the input in input order.

use crate::domain::{BugRecord, DateRange, SourceFilter};

/// The set of active predicates. `None` (or [`SourceFilter::All`]) means
/// "all" for that dimension. Not persisted; a reload starts from defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Case-insensitive substring search over ticket id, title, body, and
    /// people fields. Empty matches everything.
    pub search: String,

    /// Exact match against the record's priority label.
    pub priority: Option<String>,

    /// Matches either the `state` or the `status` field; the sources name
    /// the same concept inconsistently.
    pub state: Option<String>,

    /// Backstop re-validation of the source, independent of what the fetch
    /// layer already filtered.
    pub source: SourceFilter,

    /// Applied at fetch time by the gateway; kept here so a change can
    /// trigger a re-fetch. Not re-validated per record.
    pub date_range: Option<DateRange>,
}

impl FilterState {
    /// Reset the in-memory predicates after a source change. A priority or
    /// state picked for one source's vocabulary would silently empty the
    /// view under another source, so those selections do not survive.
    pub fn reset_for_source(&mut self, source: SourceFilter) {
        self.search.clear();
        self.priority = None;
        self.state = None;
        self.source = source;
    }

    /// Whether one record satisfies every active predicate.
    pub fn matches(&self, record: &BugRecord) -> bool {
        self.matches_source(record)
            && self.matches_priority(record)
            && self.matches_state(record)
            && self.matches_search(record)
    }

    /// Apply all predicates, preserving input order.
    pub fn apply<'a>(&self, records: &'a [BugRecord]) -> Vec<&'a BugRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    fn matches_source(&self, record: &BugRecord) -> bool {
        self.source.matches(record.source_system)
    }

    fn matches_priority(&self, record: &BugRecord) -> bool {
        match &self.priority {
            Some(priority) => record.priority_label() == priority,
            None => true,
        }
    }

    fn matches_state(&self, record: &BugRecord) -> bool {
        let Some(wanted) = &self.state else {
            return true;
        };
        let state_hit = record.state.as_deref() == Some(wanted.as_str());
        let status_hit = record.status.as_deref() == Some(wanted.as_str());
        state_hit || status_hit
    }

    fn matches_search(&self, record: &BugRecord) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        // Absent fields contribute empty strings, never a wildcard.
        let haystacks = [
            record.ticket_id.to_lowercase(),
            record.title().to_lowercase(),
            record.body().to_lowercase(),
            record.author.search_text().to_lowercase(),
            record.requester.search_text().to_lowercase(),
            record.assignee.search_text().to_lowercase(),
        ];
        haystacks.iter().any(|h| h.contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourceSystem;

    fn record(ticket: &str, source: SourceSystem) -> BugRecord {
        BugRecord {
            ticket_id: ticket.to_string(),
            source_system: source,
            ..Default::default()
        }
    }

    fn sample_set() -> Vec<BugRecord> {
        vec![
            BugRecord {
                priority: Some("High".to_string()),
                status: Some("open".to_string()),
                subject: Some("Login broken for ZD-123 users".to_string()),
                ..record("ZD-123", SourceSystem::Zendesk)
            },
            BugRecord {
                priority: Some("High".to_string()),
                state: Some("In Progress".to_string()),
                name: Some("Fix export".to_string()),
                ..record("SC-7", SourceSystem::Shortcut)
            },
            BugRecord {
                text: Some("mentions ZD-123 in passing".to_string()),
                ..record("SL--99", SourceSystem::Slack)
            },
        ]
    }

    #[test]
    fn default_filter_passes_everything() {
        let records = sample_set();
        assert_eq!(FilterState::default().apply(&records).len(), records.len());
    }

    #[test]
    fn result_is_always_a_subset() {
        let records = sample_set();
        let filters = [
            FilterState { search: "zd".to_string(), ..Default::default() },
            FilterState { priority: Some("High".to_string()), ..Default::default() },
            FilterState { state: Some("open".to_string()), ..Default::default() },
            FilterState {
                source: SourceFilter::Only(SourceSystem::Slack),
                ..Default::default()
            },
        ];
        for filter in filters {
            let out = filter.apply(&records);
            assert!(out.len() <= records.len());
            assert!(out.iter().all(|r| records.iter().any(|orig| orig == *r)));
        }
    }

    #[test]
    fn search_and_priority_are_anded() {
        // "ZD-123" appears in a Zendesk subject and a Slack body; only the
        // Zendesk record is High priority.
        let records = sample_set();
        let filter = FilterState {
            search: "ZD-123".to_string(),
            priority: Some("High".to_string()),
            ..Default::default()
        };
        let out = filter.apply(&records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ticket_id, "ZD-123");
    }

    #[test]
    fn state_filter_reads_both_field_names() {
        let records = sample_set();
        let open = FilterState {
            state: Some("open".to_string()),
            ..Default::default()
        };
        assert_eq!(open.apply(&records).len(), 1);

        let in_progress = FilterState {
            state: Some("In Progress".to_string()),
            ..Default::default()
        };
        assert_eq!(in_progress.apply(&records)[0].ticket_id, "SC-7");
    }

    #[test]
    fn missing_priority_is_unknown_not_wildcard() {
        let records = sample_set();
        let filter = FilterState {
            priority: Some("Unknown".to_string()),
            ..Default::default()
        };
        // Only the Slack record has no priority.
        let out = filter.apply(&records);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_system, SourceSystem::Slack);
    }

    #[test]
    fn absent_fields_do_not_match_text_search() {
        let records = vec![record("X-1", SourceSystem::Unknown)];
        let filter = FilterState {
            search: "anything".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn source_backstop_revalidates_each_record() {
        // Simulates contamination that slipped past fetch: the filter must
        // still exclude the mislabeled record.
        let records = vec![
            record("ZD-1", SourceSystem::Zendesk),
            record("SL-2", SourceSystem::Slack),
        ];
        let filter = FilterState {
            source: SourceFilter::Only(SourceSystem::Zendesk),
            ..Default::default()
        };
        let out = filter.apply(&records);
        assert!(out.iter().all(|r| r.source_system == SourceSystem::Zendesk));
    }

    #[test]
    fn reset_for_source_clears_other_dimensions() {
        let mut filter = FilterState {
            search: "crash".to_string(),
            priority: Some("High".to_string()),
            state: Some("open".to_string()),
            ..Default::default()
        };
        filter.reset_for_source(SourceFilter::Only(SourceSystem::Shortcut));
        assert!(filter.search.is_empty());
        assert!(filter.priority.is_none());
        assert!(filter.state.is_none());
        assert_eq!(filter.source, SourceFilter::Only(SourceSystem::Shortcut));
    }
}
