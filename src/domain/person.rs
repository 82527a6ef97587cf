use serde::{Deserialize, Serialize};

/// An author/requester/assignee field as it arrives off the wire.
///
/// The sources disagree on shape: Slack sends a resolved display name,
/// Zendesk sends a numeric requester id, Shortcut sometimes sends an object
/// with a `name`. Ingestion passes whatever it got through, so this field
/// has to accept all of them and still render something.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PersonField {
    Name(String),
    Id(i64),
    Profile {
        name: Option<String>,
        id: Option<serde_json::Value>,
    },
    #[default]
    Absent,
}

impl PersonField {
    /// Normalize into a display string. Never panics, never returns an
    /// empty string for an absent value.
    pub fn display(&self) -> String {
        match self {
            PersonField::Name(s) if !s.trim().is_empty() => s.clone(),
            PersonField::Name(_) => "Unknown".to_string(),
            PersonField::Id(id) => id.to_string(),
            PersonField::Profile { name: Some(n), .. } if !n.trim().is_empty() => n.clone(),
            PersonField::Profile { id: Some(id), .. } => match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            PersonField::Profile { .. } => "Unknown".to_string(),
            PersonField::Absent => "Unknown".to_string(),
        }
    }

    /// The string used for text search: empty when absent, so an empty
    /// search field never becomes a wildcard through this record.
    pub fn search_text(&self) -> String {
        match self {
            PersonField::Absent => String::new(),
            other => other.display(),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, PersonField::Absent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_plain_name() {
        let p: PersonField = serde_json::from_str("\"Jane Doe\"").unwrap();
        assert_eq!(p.display(), "Jane Doe");
    }

    #[test]
    fn renders_numeric_id() {
        let p: PersonField = serde_json::from_str("902441").unwrap();
        assert_eq!(p.display(), "902441");
    }

    #[test]
    fn renders_profile_object() {
        let p: PersonField = serde_json::from_str(r#"{"name": "R. Alessi", "id": 7}"#).unwrap();
        assert_eq!(p.display(), "R. Alessi");

        let p: PersonField = serde_json::from_str(r#"{"name": null, "id": "u-17"}"#).unwrap();
        assert_eq!(p.display(), "u-17");
    }

    #[test]
    fn absent_renders_unknown_but_searches_empty() {
        let p = PersonField::Absent;
        assert_eq!(p.display(), "Unknown");
        assert_eq!(p.search_text(), "");
    }

    #[test]
    fn blank_name_falls_back_to_unknown() {
        let p = PersonField::Name("   ".into());
        assert_eq!(p.display(), "Unknown");
    }
}
