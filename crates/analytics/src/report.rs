use serde::{Deserialize, Serialize};

/// Min, max and mean of one per-type series. All `None` when no type has a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

/// Aggregates of one document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStatistics {
    pub document_type: String,
    /// Rows of this type that carry a document label.
    pub documents: usize,
    /// Mean of the per-row distinct index count.
    pub mean_index_count: Option<f64>,
    /// Mean number of days between consecutive versions.
    pub mean_interval_days: Option<f64>,
}

/// The descriptive statistics of one project.
///
/// This struct is the output of `AnalyticsEngine::describe` and feeds both the
/// summary table and the correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveReport {
    pub total_submissions: usize,
    /// One entry per document type, sorted by type.
    pub per_type: Vec<TypeStatistics>,
    pub documents_per_type: SeriesSummary,
    pub index_count: SeriesSummary,
    pub interval_days: SeriesSummary,
}

impl DescriptiveReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self {
            total_submissions: 0,
            per_type: Vec::new(),
            documents_per_type: SeriesSummary::default(),
            index_count: SeriesSummary::default(),
            interval_days: SeriesSummary::default(),
        }
    }
}

impl Default for DescriptiveReport {
    fn default() -> Self {
        Self::new()
    }
}
