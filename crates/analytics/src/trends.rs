//! Revision trends: how many submissions land each month.

use chrono::Datelike;
use core_types::{Dimension, EnrichedSubmission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: Month,
    /// Value of the grouping dimension, e.g. a document type or a lot.
    pub value: String,
    pub submissions: usize,
}

/// Counts submissions per month and per value of `dimension`.
///
/// Undated rows and rows without a value for `dimension` are skipped.
/// The result is sorted by month, then value.
pub fn monthly_counts(rows: &[EnrichedSubmission], dimension: Dimension) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<(Month, &str), usize> = BTreeMap::new();

    for row in rows {
        let (Some(date), Some(value)) = (row.submission.submitted_on, dimension.value(&row.submission)) else {
            continue;
        };
        let month = Month {
            year: date.year(),
            month: date.month(),
        };
        *counts.entry((month, value)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((month, value), submissions)| MonthlyCount {
            month,
            value: value.to_string(),
            submissions,
        })
        .collect()
}
