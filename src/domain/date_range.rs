use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date bounds passed through to the gateway as
/// `start_date`/`end_date` query parameters. The gateway applies them;
/// the client does not re-check records against the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(start: NaiveDate, end: NaiveDate) -> DateRange {
        if end < start {
            DateRange { start: end, end: start }
        } else {
            DateRange { start, end }
        }
    }

    /// Parse "YYYY-MM-DD" bounds, e.g. from CLI flags.
    pub fn parse(start: &str, end: &str) -> Option<DateRange> {
        let start = start.trim().parse::<NaiveDate>().ok()?;
        let end = end.trim().parse::<NaiveDate>().ok()?;
        Some(DateRange::new(start, end))
    }

    /// Wire format for the gateway query string.
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats() {
        let range = DateRange::parse("2025-06-01", "2025-06-30").unwrap();
        assert_eq!(range.start_param(), "2025-06-01");
        assert_eq!(range.end_param(), "2025-06-30");
    }

    #[test]
    fn swaps_reversed_bounds() {
        let range = DateRange::parse("2025-06-30", "2025-06-01").unwrap();
        assert!(range.start <= range.end);
    }

    #[test]
    fn rejects_garbage() {
        assert!(DateRange::parse("June 1st", "2025-06-30").is_none());
    }
}
