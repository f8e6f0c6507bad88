//! Turns reports into terminal tables, JSON or semicolon CSV on a writer.

use analytics::{
    Breakdown, CalendarEntry, CorrelationMatrix, DescriptiveReport, DocumentFlow, MonthlyCount,
    SeriesSummary,
};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use configuration::OutputFormat;
use configuration::settings::Config;
use core_types::{Dimension, EnrichedSubmission};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// One titled grid of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Section {
    fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Serializable summary of a loaded export.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub name: String,
    pub path: String,
    pub submissions: usize,
    pub unparsed_dates: usize,
}

pub struct Renderer {
    format: OutputFormat,
    date_format: String,
    decimals: usize,
}

impl Renderer {
    pub fn new(format: OutputFormat, config: &Config) -> Self {
        Self {
            format,
            date_format: config.csv.date_format.clone(),
            decimals: config.output.decimals,
        }
    }

    /// Writes a report: `value` as JSON, or its sections as tables / CSV.
    ///
    /// CSV carries only the last section, the most detailed one.
    pub fn emit<T: Serialize>(&self, out: &mut impl Write, value: &T, sections: &[Section]) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, value)?;
                writeln!(out)?;
            }
            OutputFormat::Table => {
                for (i, section) in sections.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    if !section.title.is_empty() {
                        writeln!(out, "{}", section.title)?;
                    }
                    writeln!(out, "{}", to_table(section))?;
                }
            }
            OutputFormat::Csv => {
                let Some(section) = sections.last() else {
                    return Ok(());
                };
                let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(&mut *out);
                writer.write_record(&section.headers)?;
                for row in &section.rows {
                    writer.write_record(row)?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }

    pub fn projects(&self, projects: &[ProjectInfo]) -> Vec<Section> {
        let mut section = Section::new("Loaded projects", &["Project", "Submissions", "Unparsed dates", "Path"]);
        for project in projects {
            section.rows.push(vec![
                project.name.clone(),
                project.submissions.to_string(),
                project.unparsed_dates.to_string(),
                project.path.clone(),
            ]);
        }
        vec![section]
    }

    pub fn enriched(&self, rows: &[EnrichedSubmission]) -> Vec<Section> {
        let mut section = Section::new(
            "",
            &[
                "Submitted",
                "Document type",
                "Project",
                "Emitter",
                "Lot",
                "Indice",
                "Document label",
                "First version",
                "Last version",
                "Span (days)",
                "Indices",
                "Indices used",
                "Lot start",
                "Lot end",
                "Interval (days)",
            ],
        );
        for row in rows {
            let s = &row.submission;
            section.rows.push(vec![
                self.date(s.submitted_on),
                text(&s.document_type),
                text(&s.project),
                text(&s.emitter),
                text(&s.lot),
                text(&s.indice),
                text(&s.label),
                self.date(row.first_version),
                self.date(row.last_version),
                integer(row.span_days),
                integer(row.index_count),
                text(&row.indices_used),
                self.date(row.lot_start),
                self.date(row.lot_end),
                integer(row.interval_days),
            ]);
        }
        vec![section]
    }

    pub fn summary(&self, report: &DescriptiveReport) -> Vec<Section> {
        let mut overview = Section::new(
            format!("Statistical summary ({} submissions)", report.total_submissions),
            &["Statistic", "Minimum", "Maximum", "Mean"],
        );
        let series: [(&str, &SeriesSummary); 3] = [
            ("Documents per document type", &report.documents_per_type),
            ("Mean indices per document type", &report.index_count),
            ("Mean days between versions per document type", &report.interval_days),
        ];
        for (name, summary) in series {
            overview.rows.push(vec![
                name.to_string(),
                self.number(summary.min),
                self.number(summary.max),
                self.number(summary.mean),
            ]);
        }

        let mut per_type = Section::new(
            "Per document type",
            &["Document type", "Documents", "Mean indices", "Mean days between versions"],
        );
        for stats in &report.per_type {
            per_type.rows.push(vec![
                stats.document_type.clone(),
                stats.documents.to_string(),
                self.number(stats.mean_index_count),
                self.number(stats.mean_interval_days),
            ]);
        }

        vec![overview, per_type]
    }

    pub fn trends(&self, counts: &[MonthlyCount], dimension: Dimension) -> Vec<Section> {
        let mut section = Section::new(
            format!("Monthly submissions per {}", dimension.title().to_lowercase()),
            &["Month", dimension.title(), "Submissions"],
        );
        for count in counts {
            section.rows.push(vec![
                count.month.to_string(),
                count.value.clone(),
                count.submissions.to_string(),
            ]);
        }
        vec![section]
    }

    pub fn correlations(&self, matrix: &CorrelationMatrix) -> Vec<Section> {
        let mut headers = vec![""];
        headers.extend(matrix.variables.iter().map(String::as_str));
        let mut section = Section::new("Correlation matrix", &headers);
        for (variable, coefficients) in matrix.variables.iter().zip(&matrix.coefficients) {
            let mut row = vec![variable.clone()];
            row.extend(coefficients.iter().map(|c| self.number(*c)));
            section.rows.push(row);
        }
        vec![section]
    }

    pub fn flow(&self, flow: &DocumentFlow) -> Vec<Section> {
        let mut section = Section::new(
            format!("Document flow ({} nodes, {} links)", flow.nodes.len(), flow.links.len()),
            &["Source", "Target", "Submissions"],
        );
        for link in &flow.links {
            let label = |id| flow.node(id).map(|n| n.label.clone()).unwrap_or_default();
            section.rows.push(vec![label(link.source), label(link.target), link.value.to_string()]);
        }
        vec![section]
    }

    pub fn calendar(&self, entries: &[CalendarEntry], dimension: Dimension) -> Vec<Section> {
        let mut section = Section::new(
            format!("Calendar per {}", dimension.title().to_lowercase()),
            &[dimension.title(), "Start", "End", "Span (days)", "Submissions"],
        );
        for entry in entries {
            section.rows.push(vec![
                entry.key.clone(),
                self.date(entry.start),
                self.date(entry.end),
                integer(entry.span_days),
                entry.submissions.to_string(),
            ]);
        }
        vec![section]
    }

    pub fn breakdown(&self, breakdown: &Breakdown) -> Vec<Section> {
        let mut headers: Vec<&str> = breakdown.dimensions.iter().map(|d| d.title()).collect();
        headers.push("Submissions");
        let mut section = Section::new("", &headers);
        for row in &breakdown.rows {
            let mut cells = row.keys.clone();
            cells.push(row.submissions.to_string());
            section.rows.push(cells);
        }
        vec![section]
    }

    /// A date in the input format; empty when missing or not printable.
    fn date(&self, date: Option<NaiveDate>) -> String {
        let mut cell = String::new();
        if let Some(date) = date {
            if write!(cell, "{}", date.format(&self.date_format)).is_err() {
                cell.clear();
            }
        }
        cell
    }

    fn number(&self, value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.*}", self.decimals, v))
            .unwrap_or_default()
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn integer<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn to_table(section: &Section) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(section.headers.clone());
    for row in &section.rows {
        table.add_row(row.clone());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{AnalyticsEngine, TypeStatistics};
    use core_types::Submission;

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::new(format, &Config::default())
    }

    fn output<T: Serialize>(format: OutputFormat, value: &T, sections: &[Section]) -> String {
        let mut buffer = Vec::new();
        renderer(format).emit(&mut buffer, value, sections).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn report() -> DescriptiveReport {
        DescriptiveReport {
            total_submissions: 3,
            per_type: vec![TypeStatistics {
                document_type: "PLAN".to_string(),
                documents: 3,
                mean_index_count: Some(4.0 / 3.0),
                mean_interval_days: None,
            }],
            ..DescriptiveReport::new()
        }
    }

    #[test]
    fn numbers_use_configured_decimals_and_missing_is_empty() {
        let sections = renderer(OutputFormat::Table).summary(&report());
        assert_eq!(sections[1].rows[0], vec!["PLAN", "3", "1.33", ""]);
    }

    #[test]
    fn csv_writes_the_last_section_with_semicolons() {
        let report = report();
        let sections = renderer(OutputFormat::Csv).summary(&report);
        let text = output(OutputFormat::Csv, &report, &sections);

        assert_eq!(
            text,
            "Document type;Documents;Mean indices;Mean days between versions\nPLAN;3;1.33;\n"
        );
    }

    #[test]
    fn json_serializes_the_report_itself() {
        let report = report();
        let text = output(OutputFormat::Json, &report, &[]);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["total_submissions"], 3);
        assert_eq!(value["per_type"][0]["document_type"], "PLAN");
        assert!(value["per_type"][0]["mean_interval_days"].is_null());
    }

    #[test]
    fn table_output_contains_titles_and_cells() {
        let report = report();
        let sections = renderer(OutputFormat::Table).summary(&report);
        let text = output(OutputFormat::Table, &report, &sections);

        assert!(text.contains("Statistical summary (3 submissions)"));
        assert!(text.contains("PLAN"));
    }

    #[test]
    fn enriched_dates_use_the_input_format() {
        let submission = Submission {
            submitted_on: NaiveDate::from_ymd_opt(2023, 2, 3),
            label: Some("Plan".to_string()),
            ..Submission::default()
        };
        let rows = AnalyticsEngine::new().enrich(&[submission]);
        let sections = renderer(OutputFormat::Table).enriched(&rows);

        assert_eq!(sections[0].rows[0][0], "03/02/2023");
        assert_eq!(sections[0].rows[0][6], "Plan");
    }

    #[test]
    fn date_format_with_time_fields_renders_empty_cells() {
        let mut config = Config::default();
        config.csv.date_format = "%d/%m/%Y %H:%M".to_string();
        let renderer = Renderer::new(OutputFormat::Csv, &config);
        let entries = vec![CalendarEntry {
            key: "GO".to_string(),
            start: NaiveDate::from_ymd_opt(2023, 2, 3),
            end: NaiveDate::from_ymd_opt(2023, 2, 10),
            span_days: Some(7),
            submissions: 2,
        }];

        let sections = renderer.calendar(&entries, Dimension::Lot);
        assert_eq!(sections[0].rows[0], vec!["GO", "", "", "7", "2"]);
    }
}
