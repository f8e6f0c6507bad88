use crate::report::SeriesSummary;
use chrono::NaiveDate;

/// Earliest and latest of a set of optional dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateSpan {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

impl DateSpan {
    /// Widens the span to cover `date`. Missing dates are ignored.
    pub fn include(&mut self, date: Option<NaiveDate>) {
        if let Some(date) = date {
            self.first = Some(self.first.map_or(date, |first| first.min(date)));
            self.last = Some(self.last.map_or(date, |last| last.max(date)));
        }
    }

    /// Whole days from first to last.
    pub fn days(&self) -> Option<i64> {
        Some((self.last? - self.first?).num_days())
    }
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Min, max and mean of the present values.
pub fn summarize(values: impl IntoIterator<Item = Option<f64>>) -> SeriesSummary {
    let present: Vec<f64> = values.into_iter().flatten().collect();
    SeriesSummary {
        min: present.iter().copied().reduce(f64::min),
        max: present.iter().copied().reduce(f64::max),
        mean: mean(present.iter().copied()),
    }
}
