//! Resolution-time statistics for completed work items.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::domain::BugRecord;

/// Workflow states that count as "completed", lowercase. Covers the
/// vocabularies all three sources use for finished work.
static DONE_STATES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "done",
        "completed",
        "complete",
        "closed",
        "solved",
        "resolved",
        "merged",
    ]
});

/// Whether a record represents completed work, judged from whichever
/// workflow field its source populated.
pub fn is_completed(record: &BugRecord) -> bool {
    let state = record.workflow_state().trim().to_lowercase();
    DONE_STATES.iter().any(|done| *done == state)
}

/// Hours from creation to completion. `None` for records that are not
/// completed, are missing a timestamp, or carry reversed timestamps; those
/// are excluded from the statistics, never counted as zero.
pub fn completion_hours(record: &BugRecord) -> Option<f64> {
    if !is_completed(record) {
        return None;
    }
    let created = record.created_at()?;
    let completed = record.updated_at()?;
    let minutes = (completed - created).num_minutes();
    if minutes < 0 {
        return None;
    }
    Some(minutes as f64 / 60.0)
}

/// Fixed elapsed-time ranges for the resolution distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElapsedBucket {
    UpToFourHours,
    UpToOneDay,
    OneToThreeDays,
    ThreeToSevenDays,
    OneToTwoWeeks,
    TwoWeeksPlus,
}

impl ElapsedBucket {
    pub const ALL: [ElapsedBucket; 6] = [
        ElapsedBucket::UpToFourHours,
        ElapsedBucket::UpToOneDay,
        ElapsedBucket::OneToThreeDays,
        ElapsedBucket::ThreeToSevenDays,
        ElapsedBucket::OneToTwoWeeks,
        ElapsedBucket::TwoWeeksPlus,
    ];

    pub fn for_hours(hours: f64) -> ElapsedBucket {
        if hours < 4.0 {
            ElapsedBucket::UpToFourHours
        } else if hours < 24.0 {
            ElapsedBucket::UpToOneDay
        } else if hours < 72.0 {
            ElapsedBucket::OneToThreeDays
        } else if hours < 168.0 {
            ElapsedBucket::ThreeToSevenDays
        } else if hours < 336.0 {
            ElapsedBucket::OneToTwoWeeks
        } else {
            ElapsedBucket::TwoWeeksPlus
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ElapsedBucket::UpToFourHours => "0-4h",
            ElapsedBucket::UpToOneDay => "4-24h",
            ElapsedBucket::OneToThreeDays => "1-3 days",
            ElapsedBucket::ThreeToSevenDays => "3-7 days",
            ElapsedBucket::OneToTwoWeeks => "1-2 weeks",
            ElapsedBucket::TwoWeeksPlus => "2+ weeks",
        }
    }
}

/// Completed-card counts per elapsed-time bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionDistribution {
    pub counts: BTreeMap<ElapsedBucket, u64>,
    pub total_completed: u64,
}

impl ResolutionDistribution {
    pub fn count(&self, bucket: ElapsedBucket) -> u64 {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }

    /// Share of completed cards in this bucket, as a percentage.
    /// Zero completed cards yields 0.0 for every bucket, never NaN.
    pub fn percent(&self, bucket: ElapsedBucket) -> f64 {
        if self.total_completed == 0 {
            0.0
        } else {
            (self.count(bucket) as f64 / self.total_completed as f64) * 100.0
        }
    }
}

/// min/avg/median/max over one group of elapsed-hour samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElapsedSummary {
    pub completed: usize,
    pub avg_hours: f64,
    pub median_hours: f64,
    pub min_hours: f64,
    pub max_hours: f64,
}

impl ElapsedSummary {
    fn from_samples(mut samples: Vec<f64>) -> ElapsedSummary {
        if samples.is_empty() {
            return ElapsedSummary::default();
        }
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = samples.len();
        let avg = samples.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            samples[n / 2]
        } else {
            (samples[n / 2 - 1] + samples[n / 2]) / 2.0
        };
        ElapsedSummary {
            completed: n,
            avg_hours: avg,
            median_hours: median,
            min_hours: samples[0],
            max_hours: samples[n - 1],
        }
    }
}

/// Resolution statistics over the currently loaded record set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionStats {
    pub overall: ElapsedSummary,
    /// Per-priority summaries, ordered by priority label.
    pub by_priority: BTreeMap<String, ElapsedSummary>,
    pub distribution: ResolutionDistribution,
}

/// Compute resolution stats from already-fetched records. Records without a
/// completion timestamp are excluded, not counted as zero.
pub fn resolution_stats(records: &[BugRecord]) -> ResolutionStats {
    let mut all_samples = Vec::new();
    let mut per_priority: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut distribution = ResolutionDistribution::default();

    for record in records {
        let Some(hours) = completion_hours(record) else {
            continue;
        };
        all_samples.push(hours);
        per_priority
            .entry(record.priority_label().to_string())
            .or_default()
            .push(hours);
        *distribution
            .counts
            .entry(ElapsedBucket::for_hours(hours))
            .or_insert(0) += 1;
        distribution.total_completed += 1;
    }

    ResolutionStats {
        overall: ElapsedSummary::from_samples(all_samples),
        by_priority: per_priority
            .into_iter()
            .map(|(priority, samples)| (priority, ElapsedSummary::from_samples(samples)))
            .collect(),
        distribution,
    }
}
