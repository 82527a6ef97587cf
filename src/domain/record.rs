use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PersonField, SourceSystem};

/// One normalized bug record, exactly as ingestion wrote it to the store.
///
/// Field naming follows the wire format, inconsistencies included: Zendesk
/// records carry `status` and `subject`, Shortcut carries `state` and `name`,
/// Slack carries only `text`. The accessors below read whichever variant is
/// present; the raw fields stay untouched so the record can round-trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BugRecord {
    /// Ticket identifier, e.g. "ZD-1042", "SC-317", "SL--1708300112000".
    #[serde(rename = "PK", default)]
    pub ticket_id: String,

    /// Composite sort key: "<source>#<native id>".
    #[serde(rename = "SK", default)]
    pub sort_key: String,

    #[serde(rename = "sourceSystem", default)]
    pub source_system: SourceSystem,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Workflow state as Slack/Shortcut name it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Workflow state as Zendesk names it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Shortcut story name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Zendesk ticket subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Free-text body (Slack message text, Zendesk description).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Shortcut story description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "createdAt", default)]
    pub created_at_raw: String,

    #[serde(rename = "updatedAt", default)]
    pub updated_at_raw: String,

    #[serde(default, skip_serializing_if = "PersonField::is_absent")]
    pub author: PersonField,

    #[serde(default, skip_serializing_if = "PersonField::is_absent")]
    pub requester: PersonField,

    #[serde(default, skip_serializing_if = "PersonField::is_absent")]
    pub assignee: PersonField,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl BugRecord {
    /// Display title: Shortcut name, else Zendesk subject, else the first
    /// line of the body, else "Untitled".
    pub fn title(&self) -> String {
        if let Some(name) = non_blank(&self.name) {
            return name.to_string();
        }
        if let Some(subject) = non_blank(&self.subject) {
            return subject.to_string();
        }
        let body = self.body();
        match body.lines().next().map(str::trim).filter(|l| !l.is_empty()) {
            Some(line) => line.to_string(),
            None => "Untitled".to_string(),
        }
    }

    /// Free-text body, whichever field carries it. Empty string when absent.
    pub fn body(&self) -> &str {
        non_blank(&self.text)
            .or_else(|| non_blank(&self.description))
            .unwrap_or("")
    }

    /// Workflow state regardless of which field the source used.
    /// Missing on both fields means "Unknown", never an error.
    pub fn workflow_state(&self) -> &str {
        non_blank(&self.state)
            .or_else(|| non_blank(&self.status))
            .unwrap_or("Unknown")
    }

    /// Priority with the missing-value rule applied: absent means "Unknown"
    /// and still counts in aggregates.
    pub fn priority_label(&self) -> &str {
        non_blank(&self.priority).unwrap_or("Unknown")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at_raw)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at_raw)
    }

    /// Who to show in the "reporter" column: author (Slack), else requester
    /// (Zendesk), else assignee (Shortcut stories are owner-attributed).
    pub fn reporter_display(&self) -> String {
        if !self.author.is_absent() {
            self.author.display()
        } else if !self.requester.is_absent() {
            self.requester.display()
        } else {
            self.assignee.display()
        }
    }
}

/// Parse the timestamp formats ingestion actually emits: RFC 3339 with
/// offset (Zendesk/Shortcut) and bare ISO without offset (Slack, which
/// stringifies a local datetime). Bare values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Some(naive.and_utc());
    }
    // Date-only values land at midnight UTC.
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zendesk_json() -> &'static str {
        r#"{
            "PK": "ZD-1042",
            "SK": "zendesk#1042",
            "sourceSystem": "zendesk",
            "priority": "High",
            "status": "open",
            "subject": "Checkout fails on Safari",
            "text": "Customer reports checkout button does nothing.",
            "createdAt": "2025-06-02T09:15:00Z",
            "updatedAt": "2025-06-04T17:40:00Z",
            "requester": 902441,
            "assignee": "Dana",
            "tags": ["bug", "checkout"]
        }"#
    }

    #[test]
    fn zendesk_record_reads_status_and_subject() {
        let rec: BugRecord = serde_json::from_str(zendesk_json()).unwrap();
        assert_eq!(rec.ticket_id, "ZD-1042");
        assert_eq!(rec.source_system, SourceSystem::Zendesk);
        assert_eq!(rec.workflow_state(), "open");
        assert_eq!(rec.title(), "Checkout fails on Safari");
        assert_eq!(rec.priority_label(), "High");
        assert_eq!(rec.reporter_display(), "902441");
    }

    #[test]
    fn slack_record_with_missing_fields_defaults() {
        let rec: BugRecord = serde_json::from_str(
            r#"{
                "PK": "SL--1708300112000",
                "SK": "slack#C042#1708300112.000",
                "sourceSystem": "slack",
                "text": "the export crashes\nwhen the list is empty",
                "createdAt": "2024-02-18T23:48:32",
                "updatedAt": "2024-02-18T23:48:32",
                "author": "Pat K"
            }"#,
        )
        .unwrap();
        // No priority, no state: both report "Unknown", record stays usable.
        assert_eq!(rec.priority_label(), "Unknown");
        assert_eq!(rec.workflow_state(), "Unknown");
        assert_eq!(rec.title(), "the export crashes");
        assert!(rec.created_at().is_some());
    }

    #[test]
    fn completely_sparse_record_still_deserializes() {
        let rec: BugRecord = serde_json::from_str(r#"{"PK": "X-1"}"#).unwrap();
        assert_eq!(rec.source_system, SourceSystem::Unknown);
        assert_eq!(rec.title(), "Untitled");
        assert_eq!(rec.body(), "");
        assert_eq!(rec.created_at(), None);
        assert_eq!(rec.reporter_display(), "Unknown");
    }

    #[test]
    fn timestamp_formats() {
        assert!(parse_timestamp("2025-06-02T09:15:00Z").is_some());
        assert!(parse_timestamp("2025-06-02T09:15:00+02:00").is_some());
        assert!(parse_timestamp("2024-02-18T23:48:32").is_some());
        assert!(parse_timestamp("2024-02-18").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn elapsed_between_create_and_update() {
        let rec: BugRecord = serde_json::from_str(zendesk_json()).unwrap();
        let hours = (rec.updated_at().unwrap() - rec.created_at().unwrap()).num_minutes() as f64
            / 60.0;
        assert!((hours - 56.416).abs() < 0.01);
    }
}
