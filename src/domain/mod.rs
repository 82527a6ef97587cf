//! Core domain types for bugdeck

mod date_range;
mod person;
mod record;
mod source;

pub use date_range::DateRange;
pub use person::PersonField;
pub use record::{parse_timestamp, BugRecord};
pub use source::{SourceFilter, SourceSystem};
