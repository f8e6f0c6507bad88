use crate::stats::DateSpan;
use chrono::NaiveDate;
use core_types::{Dimension, EnrichedSubmission};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Activity window of one lot, project, or other dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub key: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub span_days: Option<i64>,
    pub submissions: usize,
}

/// First and last submission per value of `dimension`.
///
/// Sorted by start date, entries without any dated submission last, ties by key.
pub fn calendar(rows: &[EnrichedSubmission], dimension: Dimension) -> Vec<CalendarEntry> {
    let mut spans: BTreeMap<&str, (DateSpan, usize)> = BTreeMap::new();
    for row in rows {
        if let Some(key) = dimension.value(&row.submission) {
            let (span, count) = spans.entry(key).or_default();
            span.include(row.submission.submitted_on);
            *count += 1;
        }
    }

    let mut entries: Vec<CalendarEntry> = spans
        .into_iter()
        .map(|(key, (span, submissions))| CalendarEntry {
            key: key.to_string(),
            start: span.first,
            end: span.last,
            span_days: span.days(),
            submissions,
        })
        .collect();

    // BTreeMap order already sorts by key; a stable sort keeps it for ties.
    entries.sort_by_key(|entry| (entry.start.is_none(), entry.start));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AnalyticsEngine;
    use crate::test_support::{date, row, sample};

    #[test]
    fn lots_are_ordered_by_start_date() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let lots = calendar(&rows, Dimension::Lot);

        assert_eq!(
            lots,
            vec![
                CalendarEntry {
                    key: "GO".to_string(),
                    start: date(2023, 1, 1),
                    end: date(2023, 1, 21),
                    span_days: Some(20),
                    submissions: 4,
                },
                CalendarEntry {
                    key: "CVC".to_string(),
                    start: date(2023, 1, 5),
                    end: date(2023, 2, 15),
                    span_days: Some(41),
                    submissions: 2,
                },
            ]
        );
    }

    #[test]
    fn undated_values_come_last() {
        let submissions = vec![
            row("", "PLAN", "Annexe", "ARCHI", "GO", "A", "Doc"),
            row("03/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", "Doc"),
        ];
        let projects = calendar(&AnalyticsEngine::new().enrich(&submissions), Dimension::Project);

        assert_eq!(projects[0].key, "Ecole");
        assert_eq!(projects[1].key, "Annexe");
        assert_eq!(projects[1].span_days, None);
    }
}
