use crate::report::{DescriptiveReport, TypeStatistics};
use crate::stats::{DateSpan, mean, summarize};
use chrono::NaiveDate;
use configuration::AnalysisSettings;
use core_types::{EnrichedSubmission, Submission};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// `(document type, lot, label)`: one document across all of its versions.
type DocumentKey<'a> = (&'a str, &'a str, &'a str);

/// What is known about one document after scanning every submission.
#[derive(Debug, Default)]
struct DocumentHistory<'a> {
    span: DateSpan,
    /// Distinct indices, a missing indice recorded as "".
    indices: BTreeSet<&'a str>,
}

#[derive(Debug, Default)]
struct TypeAccumulator {
    documents: usize,
    index_counts: Vec<f64>,
    intervals: Vec<f64>,
}

/// A stateless calculator deriving document statistics from GED submissions.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {
    fill_missing_intervals: bool,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: &AnalysisSettings) -> Self {
        Self {
            fill_missing_intervals: settings.fill_missing_intervals,
        }
    }

    /// Computes the derived columns of every submission.
    ///
    /// The result is ordered by document label, then submission date, with
    /// missing labels and dates last. The interval of a row is measured from
    /// the row before it when both share a label, which this ordering makes
    /// the previous version of the same document.
    pub fn enrich(&self, submissions: &[Submission]) -> Vec<EnrichedSubmission> {
        let documents = document_histories(submissions);
        let lots = lot_spans(submissions);

        let mut rows: Vec<EnrichedSubmission> = submissions
            .iter()
            .map(|submission| {
                let mut row = EnrichedSubmission::bare(submission.clone());

                if let Some(history) = document_key(submission).and_then(|key| documents.get(&key)) {
                    row.first_version = history.span.first;
                    row.last_version = history.span.last;
                    row.span_days = history.span.days();
                    row.index_count = Some(history.indices.iter().filter(|i| !i.is_empty()).count());
                    row.indices_used = Some(history.indices.iter().copied().collect::<Vec<_>>().join(", "));
                }

                if let Some(span) = submission.lot.as_deref().and_then(|lot| lots.get(lot)) {
                    row.lot_start = span.first;
                    row.lot_end = span.last;
                }

                row
            })
            .collect();

        rows.sort_by(|a, b| {
            missing_last(&a.submission.label, &b.submission.label)
                .then_with(|| missing_last(&a.submission.submitted_on, &b.submission.submitted_on))
        });
        self.assign_intervals(&mut rows);

        tracing::debug!(
            rows = rows.len(),
            documents = documents.len(),
            lots = lots.len(),
            "Enriched submissions"
        );
        rows
    }

    /// Computes the per-type statistics and their summaries.
    pub fn describe(&self, rows: &[EnrichedSubmission]) -> DescriptiveReport {
        let mut report = DescriptiveReport::new();
        report.total_submissions = rows.len();

        if rows.is_empty() {
            return report;
        }

        let mut by_type: BTreeMap<&str, TypeAccumulator> = BTreeMap::new();
        for row in rows {
            let Some(document_type) = row.submission.document_type.as_deref() else {
                continue;
            };
            let acc = by_type.entry(document_type).or_default();
            if row.submission.label.is_some() {
                acc.documents += 1;
            }
            if let Some(count) = row.index_count {
                acc.index_counts.push(count as f64);
            }
            if let Some(days) = row.interval_days {
                acc.intervals.push(days as f64);
            }
        }

        report.per_type = by_type
            .into_iter()
            .map(|(document_type, acc)| TypeStatistics {
                document_type: document_type.to_string(),
                documents: acc.documents,
                mean_index_count: mean(acc.index_counts),
                mean_interval_days: mean(acc.intervals),
            })
            .collect();

        report.documents_per_type = summarize(report.per_type.iter().map(|t| Some(t.documents as f64)));
        report.index_count = summarize(report.per_type.iter().map(|t| t.mean_index_count));
        report.interval_days = summarize(report.per_type.iter().map(|t| t.mean_interval_days));

        report
    }

    /// Fills `interval_days` on rows already sorted by label then date.
    fn assign_intervals(&self, rows: &mut [EnrichedSubmission]) {
        for i in 0..rows.len() {
            let interval = match i.checked_sub(1) {
                Some(previous) => days_between_versions(&rows[previous].submission, &rows[i].submission),
                None => None,
            };
            rows[i].interval_days = match interval {
                None if self.fill_missing_intervals => Some(0),
                other => other,
            };
        }
    }
}

fn document_key(submission: &Submission) -> Option<DocumentKey<'_>> {
    Some((
        submission.document_type.as_deref()?,
        submission.lot.as_deref()?,
        submission.label.as_deref()?,
    ))
}

fn document_histories(submissions: &[Submission]) -> HashMap<DocumentKey<'_>, DocumentHistory<'_>> {
    let mut documents: HashMap<DocumentKey<'_>, DocumentHistory<'_>> = HashMap::new();
    for submission in submissions {
        let Some(key) = document_key(submission) else {
            continue;
        };
        let history = documents.entry(key).or_default();
        history.span.include(submission.submitted_on);
        history.indices.insert(submission.indice.as_deref().unwrap_or(""));
    }
    documents
}

fn lot_spans(submissions: &[Submission]) -> HashMap<&str, DateSpan> {
    let mut lots: HashMap<&str, DateSpan> = HashMap::new();
    for submission in submissions {
        if let Some(lot) = submission.lot.as_deref() {
            lots.entry(lot).or_default().include(submission.submitted_on);
        }
    }
    lots
}

/// Day delta from `previous` to `current` when both are dated versions of the same label.
fn days_between_versions(previous: &Submission, current: &Submission) -> Option<i64> {
    let label = current.label.as_deref()?;
    if previous.label.as_deref() != Some(label) {
        return None;
    }
    let (from, to): (NaiveDate, NaiveDate) = (previous.submitted_on?, current.submitted_on?);
    Some((to - from).num_days())
}

/// Orders present values ascending, then missing ones.
fn missing_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, row, sample};

    fn labels_and_intervals(rows: &[EnrichedSubmission]) -> Vec<(Option<&str>, Option<i64>)> {
        rows.iter()
            .map(|r| (r.submission.label.as_deref(), r.interval_days))
            .collect()
    }

    #[test]
    fn document_groups_get_first_and_last_version() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let plan = rows
            .iter()
            .find(|r| r.submission.label.as_deref() == Some("Plan RDC"))
            .unwrap();

        assert_eq!(plan.first_version, date(2023, 1, 1));
        assert_eq!(plan.last_version, date(2023, 1, 21));
        assert_eq!(plan.span_days, Some(20));
        assert_eq!(plan.index_count, Some(2));
        assert_eq!(plan.indices_used.as_deref(), Some("A, B"));
    }

    #[test]
    fn missing_indice_is_not_counted_but_appears_in_the_join() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let note = rows
            .iter()
            .find(|r| r.submission.label.as_deref() == Some("Note"))
            .unwrap();

        assert_eq!(note.index_count, Some(1));
        assert_eq!(note.indices_used.as_deref(), Some(", 0"));
        assert_eq!(note.span_days, Some(41));
    }

    #[test]
    fn undated_document_has_no_span() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let undated = rows
            .iter()
            .find(|r| r.submission.label.as_deref() == Some("Plan R+1"))
            .unwrap();

        assert_eq!(undated.first_version, None);
        assert_eq!(undated.span_days, None);
        assert_eq!(undated.index_count, Some(1));
        assert_eq!(undated.indices_used.as_deref(), Some("C"));
        // The lot is still dated by its other submissions.
        assert_eq!(undated.lot_start, date(2023, 1, 1));
        assert_eq!(undated.lot_end, date(2023, 1, 21));
    }

    #[test]
    fn rows_are_ordered_by_label_then_date_with_intervals() {
        let rows = AnalyticsEngine::new().enrich(&sample());

        assert_eq!(
            labels_and_intervals(&rows),
            vec![
                (Some("Note"), None),
                (Some("Note"), Some(41)),
                (Some("Plan R+1"), None),
                (Some("Plan RDC"), None),
                (Some("Plan RDC"), Some(10)),
                (Some("Plan RDC"), Some(10)),
            ]
        );
    }

    #[test]
    fn lot_bounds_cover_every_dated_submission_of_the_lot() {
        let rows = AnalyticsEngine::new().enrich(&sample());
        let cvc: Vec<_> = rows
            .iter()
            .filter(|r| r.submission.lot.as_deref() == Some("CVC"))
            .collect();

        assert_eq!(cvc.len(), 2);
        for row in cvc {
            assert_eq!(row.lot_start, date(2023, 1, 5));
            assert_eq!(row.lot_end, date(2023, 2, 15));
        }
    }

    #[test]
    fn incomplete_key_gets_no_document_values_but_keeps_its_interval() {
        let submissions = vec![
            row("01/03/2023", "PLAN", "Ecole", "ARCHI", "", "A", "Coupe"),
            row("04/03/2023", "PLAN", "Ecole", "ARCHI", "", "B", "Coupe"),
        ];
        let rows = AnalyticsEngine::new().enrich(&submissions);

        assert!(rows.iter().all(|r| r.first_version.is_none()));
        assert!(rows.iter().all(|r| r.index_count.is_none()));
        assert!(rows.iter().all(|r| r.lot_start.is_none()));
        assert_eq!(rows[1].interval_days, Some(3));
    }

    #[test]
    fn undated_version_breaks_the_interval_chain() {
        let submissions = vec![
            row("01/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", "Coupe"),
            row("", "PLAN", "Ecole", "ARCHI", "GO", "B", "Coupe"),
            row("09/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "C", "Coupe"),
        ];
        let rows = AnalyticsEngine::new().enrich(&submissions);

        // Undated rows sort last within the label.
        assert_eq!(rows[2].submission.submitted_on, None);
        assert_eq!(
            rows.iter().map(|r| r.interval_days).collect::<Vec<_>>(),
            vec![None, Some(8), None]
        );
    }

    #[test]
    fn same_day_versions_have_zero_interval() {
        let submissions = vec![
            row("01/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", "Coupe"),
            row("01/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "B", "Coupe"),
        ];
        let rows = AnalyticsEngine::new().enrich(&submissions);
        assert_eq!(rows[1].interval_days, Some(0));
    }

    #[test]
    fn fill_option_turns_missing_intervals_into_zero() {
        let engine = AnalyticsEngine::with_settings(&AnalysisSettings {
            fill_missing_intervals: true,
        });
        let rows = engine.enrich(&sample());

        assert!(rows.iter().all(|r| r.interval_days.is_some()));
        assert_eq!(rows[0].interval_days, Some(0));
        assert_eq!(rows[1].interval_days, Some(41));

        // Filled zeros take part in the per-type means.
        let report = engine.describe(&rows);
        assert_eq!(report.per_type[0].mean_interval_days, Some(20.5));
        assert_eq!(report.per_type[1].document_type, "PLAN");
        assert_eq!(report.per_type[1].mean_interval_days, Some(5.0));
    }

    #[test]
    fn describe_aggregates_per_document_type() {
        let engine = AnalyticsEngine::new();
        let report = engine.describe(&engine.enrich(&sample()));

        assert_eq!(report.total_submissions, 6);
        assert_eq!(report.per_type.len(), 2);

        let note = &report.per_type[0];
        assert_eq!(note.document_type, "NOTE");
        assert_eq!(note.documents, 2);
        assert_eq!(note.mean_index_count, Some(1.0));
        assert_eq!(note.mean_interval_days, Some(41.0));

        let plan = &report.per_type[1];
        assert_eq!(plan.document_type, "PLAN");
        assert_eq!(plan.documents, 4);
        assert_eq!(plan.mean_index_count, Some(1.75));
        assert_eq!(plan.mean_interval_days, Some(10.0));

        assert_eq!(report.documents_per_type.min, Some(2.0));
        assert_eq!(report.documents_per_type.max, Some(4.0));
        assert_eq!(report.documents_per_type.mean, Some(3.0));
        assert_eq!(report.interval_days.mean, Some(25.5));
    }

    #[test]
    fn describe_counts_only_labelled_rows_as_documents() {
        let engine = AnalyticsEngine::new();
        let submissions = vec![
            row("01/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", ""),
            row("02/03/2023", "PLAN", "Ecole", "ARCHI", "GO", "A", "Coupe"),
        ];
        let report = engine.describe(&engine.enrich(&submissions));

        assert_eq!(report.total_submissions, 2);
        assert_eq!(report.per_type[0].documents, 1);
    }

    #[test]
    fn describe_of_empty_input_is_empty() {
        let report = AnalyticsEngine::new().describe(&[]);
        assert_eq!(report, DescriptiveReport::new());
    }
}
