//! Wire types for the query gateway responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregate counts returned by `query_type=summary`, and also produced
/// locally by [`crate::metrics::summary_counts`] as a cross-check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SummaryCounts {
    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub by_priority: BTreeMap<String, u64>,

    #[serde(default)]
    pub by_state: BTreeMap<String, u64>,

    #[serde(default)]
    pub by_source: BTreeMap<String, u64>,
}

/// One day of activity from `query_type=time_series`. The gateway zero-fills
/// days with no activity, so consecutive points are always one day apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    #[serde(default)]
    pub count: u64,
}
