use serde::{Deserialize, Serialize};

/// The upstream platform a record originated from.
///
/// Slack and Zendesk are where reports come in; Shortcut is where work items
/// get created. Ingestion tags every record with one of these, but the label
/// arrives as a free string, so unknown values map to `Unknown` instead of
/// failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceSystem {
    Slack,
    Zendesk,
    Shortcut,
    #[serde(other)]
    #[default]
    Unknown,
}

impl SourceSystem {
    /// The three real sources, in the order they are fetched and displayed.
    pub const ALL: [SourceSystem; 3] = [
        SourceSystem::Slack,
        SourceSystem::Zendesk,
        SourceSystem::Shortcut,
    ];

    /// Wire name, as stored in the record's `sourceSystem` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceSystem::Slack => "slack",
            SourceSystem::Zendesk => "zendesk",
            SourceSystem::Shortcut => "shortcut",
            SourceSystem::Unknown => "unknown",
        }
    }

    /// Human-readable label for table cells and dropdowns.
    pub fn label(&self) -> &'static str {
        match self {
            SourceSystem::Slack => "Slack",
            SourceSystem::Zendesk => "Zendesk",
            SourceSystem::Shortcut => "Shortcut",
            SourceSystem::Unknown => "Unknown",
        }
    }

    /// Parse a wire name. Anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> SourceSystem {
        match s.trim().to_lowercase().as_str() {
            "slack" => SourceSystem::Slack,
            "zendesk" => SourceSystem::Zendesk,
            "shortcut" => SourceSystem::Shortcut,
            _ => SourceSystem::Unknown,
        }
    }

    /// Sources where bug reports arrive (the flow-metrics denominator).
    pub fn is_upstream(&self) -> bool {
        matches!(self, SourceSystem::Slack | SourceSystem::Zendesk)
    }

    /// Sources where work items are created (the flow-metrics numerator).
    pub fn is_downstream(&self) -> bool {
        matches!(self, SourceSystem::Shortcut)
    }
}

impl std::fmt::Display for SourceSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Fetch selector: either every real source or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFilter {
    #[default]
    All,
    Only(SourceSystem),
}

impl SourceFilter {
    /// The sources a fetch with this selector will actually request.
    pub fn sources(&self) -> Vec<SourceSystem> {
        match self {
            SourceFilter::All => SourceSystem::ALL.to_vec(),
            SourceFilter::Only(s) => vec![*s],
        }
    }

    /// Whether a record with the given source passes this selector.
    pub fn matches(&self, source: SourceSystem) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Only(s) => *s == source,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFilter::All => "All sources",
            SourceFilter::Only(s) => s.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_and_unknown_sources() {
        assert_eq!(SourceSystem::parse("zendesk"), SourceSystem::Zendesk);
        assert_eq!(SourceSystem::parse(" Slack "), SourceSystem::Slack);
        assert_eq!(SourceSystem::parse("jira"), SourceSystem::Unknown);
        assert_eq!(SourceSystem::parse(""), SourceSystem::Unknown);
    }

    #[test]
    fn unknown_source_deserializes_without_error() {
        let s: SourceSystem = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(s, SourceSystem::Unknown);
        let s: SourceSystem = serde_json::from_str("\"shortcut\"").unwrap();
        assert_eq!(s, SourceSystem::Shortcut);
    }

    #[test]
    fn filter_matches() {
        assert!(SourceFilter::All.matches(SourceSystem::Slack));
        assert!(SourceFilter::Only(SourceSystem::Zendesk).matches(SourceSystem::Zendesk));
        assert!(!SourceFilter::Only(SourceSystem::Zendesk).matches(SourceSystem::Slack));
        assert_eq!(SourceFilter::All.sources().len(), 3);
    }
}
