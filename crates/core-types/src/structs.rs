use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a GED export: a single submission of a document version.
///
/// Text fields are `None` when the cell was empty, and `submitted_on` is `None`
/// when the cell did not parse as a date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submitted_on: Option<NaiveDate>,
    pub document_type: Option<String>,
    pub project: Option<String>,
    pub emitter: Option<String>,
    pub lot: Option<String>,
    pub indice: Option<String>,
    pub label: Option<String>,
}

/// A submission augmented with the values derived from its groups.
///
/// Document-level fields are computed over the `(document type, lot, label)`
/// group and are `None` when any part of that key is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub first_version: Option<NaiveDate>,
    pub last_version: Option<NaiveDate>,
    /// Days between the first and the last version of the document.
    pub span_days: Option<i64>,
    /// Distinct non-empty indices seen for the document.
    pub index_count: Option<usize>,
    /// Sorted distinct indices joined with ", ".
    pub indices_used: Option<String>,
    pub lot_start: Option<NaiveDate>,
    pub lot_end: Option<NaiveDate>,
    /// Days since the previous submission with the same label.
    pub interval_days: Option<i64>,
}

impl EnrichedSubmission {
    /// Wraps a submission with every derived value unset.
    pub fn bare(submission: Submission) -> Self {
        Self {
            submission,
            first_version: None,
            last_version: None,
            span_days: None,
            index_count: None,
            indices_used: None,
            lot_start: None,
            lot_end: None,
            interval_days: None,
        }
    }
}
