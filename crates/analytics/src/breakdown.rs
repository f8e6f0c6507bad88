use crate::error::AnalyticsError;
use core_types::{Dimension, EnrichedSubmission};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    /// One value per requested dimension, in request order.
    pub keys: Vec<String>,
    pub submissions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub dimensions: Vec<Dimension>,
    pub rows: Vec<BreakdownRow>,
}

/// Counts submissions per combination of `dimensions`.
///
/// Rows missing any of the values are skipped. Sorted by descending count, then
/// keys; `top` keeps only the first entries.
pub fn breakdown(
    rows: &[EnrichedSubmission],
    dimensions: &[Dimension],
    top: Option<usize>,
) -> Result<Breakdown, AnalyticsError> {
    if dimensions.is_empty() {
        return Err(AnalyticsError::InvalidInput(
            "a breakdown needs at least one dimension".to_string(),
        ));
    }

    let mut counts: HashMap<Vec<&str>, usize> = HashMap::new();
    for row in rows {
        let keys: Option<Vec<&str>> = dimensions
            .iter()
            .map(|d| d.value(&row.submission))
            .collect();
        if let Some(keys) = keys {
            *counts.entry(keys).or_insert(0) += 1;
        }
    }

    let mut result: Vec<BreakdownRow> = counts
        .into_iter()
        .map(|(keys, submissions)| BreakdownRow {
            keys: keys.into_iter().map(str::to_string).collect(),
            submissions,
        })
        .collect();
    result.sort_by(|a, b| b.submissions.cmp(&a.submissions).then_with(|| a.keys.cmp(&b.keys)));
    if let Some(top) = top {
        result.truncate(top);
    }

    Ok(Breakdown {
        dimensions: dimensions.to_vec(),
        rows: result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalyticsEngine;
    use crate::test_support::sample;

    fn flat(breakdown: &Breakdown) -> Vec<(Vec<&str>, usize)> {
        breakdown
            .rows
            .iter()
            .map(|r| (r.keys.iter().map(String::as_str).collect(), r.submissions))
            .collect()
    }

    #[test]
    fn main_emitters_come_first() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let emitters = breakdown(&rows, &[Dimension::Emitter], None).unwrap();

        assert_eq!(flat(&emitters), vec![(vec!["ARCHI"], 4), (vec!["BET"], 2)]);
    }

    #[test]
    fn combined_dimensions_skip_incomplete_rows() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let by_lot_and_indice = breakdown(&rows, &[Dimension::Lot, Dimension::Indice], None).unwrap();

        assert_eq!(
            flat(&by_lot_and_indice),
            vec![
                (vec!["GO", "B"], 2),
                (vec!["CVC", "0"], 1),
                (vec!["GO", "A"], 1),
                (vec!["GO", "C"], 1),
            ]
        );
    }

    #[test]
    fn top_truncates() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let top = breakdown(&rows, &[Dimension::Indice], Some(1)).unwrap();
        assert_eq!(flat(&top), vec![(vec!["B"], 2)]);
    }

    #[test]
    fn no_dimension_is_rejected() {
        assert!(matches!(
            breakdown(&[], &[], None),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }
}
