use crate::decode::decode;
use crate::error::IngestError;
use chrono::NaiveDate;
use configuration::{ColumnNames, CsvSettings};
use core_types::Submission;
use csv::StringRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// The parsed content of one export file.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File name, used as the project key.
    pub name: String,
    pub path: PathBuf,
    pub submissions: Vec<Submission>,
    /// Non-empty date cells that did not match the configured format.
    pub unparsed_dates: usize,
}

/// Positions of the seven columns in the header row.
struct ColumnIndex {
    submitted_on: usize,
    document_type: usize,
    project: usize,
    emitter: usize,
    lot: usize,
    indice: usize,
    label: usize,
}

impl ColumnIndex {
    fn resolve(path: &Path, headers: &StringRecord, columns: &ColumnNames) -> Result<Self, IngestError> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| normalize_header(h) == wanted.trim())
                .ok_or_else(|| IngestError::MissingColumn {
                    path: path.to_path_buf(),
                    column: wanted.to_string(),
                })
        };

        Ok(Self {
            submitted_on: find(&columns.submitted_on)?,
            document_type: find(&columns.document_type)?,
            project: find(&columns.project)?,
            emitter: find(&columns.emitter)?,
            lot: find(&columns.lot)?,
            indice: find(&columns.indice)?,
            label: find(&columns.label)?,
        })
    }
}

fn normalize_header(name: &str) -> &str {
    name.trim().trim_start_matches('\u{feff}')
}

/// Reads, decodes and parses one export file.
pub fn load_file(
    path: &Path,
    csv_settings: &CsvSettings,
    columns: &ColumnNames,
) -> Result<Dataset, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes, csv_settings.encoding).map_err(|offset| IngestError::Encoding {
        path: path.to_path_buf(),
        offset,
    })?;

    let (submissions, unparsed_dates) = parse_submissions(path, &text, csv_settings, columns)?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    tracing::debug!(
        file = %path.display(),
        rows = submissions.len(),
        unparsed_dates,
        "Loaded export"
    );

    Ok(Dataset {
        name,
        path: path.to_path_buf(),
        submissions,
        unparsed_dates,
    })
}

/// Parses decoded CSV text into submissions.
///
/// Returns the rows and the number of date cells that failed to parse.
/// `origin` is only used in error messages.
pub fn parse_submissions(
    origin: &Path,
    text: &str,
    csv_settings: &CsvSettings,
    columns: &ColumnNames,
) -> Result<(Vec<Submission>, usize), IngestError> {
    let csv_error = |source: csv::Error| IngestError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(csv_settings.delimiter_byte()?)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    let index = ColumnIndex::resolve(origin, &headers, columns)?;

    let mut submissions = Vec::new();
    let mut unparsed_dates = 0usize;

    for result in reader.records() {
        let record = result.map_err(csv_error)?;

        let submitted_on = match cell(&record, index.submitted_on) {
            Some(raw) => {
                let parsed = parse_date(raw, &csv_settings.date_format);
                if parsed.is_none() {
                    unparsed_dates += 1;
                }
                parsed
            }
            None => None,
        };

        submissions.push(Submission {
            submitted_on,
            document_type: owned_cell(&record, index.document_type),
            project: owned_cell(&record, index.project),
            emitter: owned_cell(&record, index.emitter),
            lot: owned_cell(&record, index.lot),
            indice: owned_cell(&record, index.indice),
            label: owned_cell(&record, index.label),
        });
    }

    if unparsed_dates > 0 {
        tracing::warn!(
            file = %origin.display(),
            unparsed_dates,
            "Some submission dates did not match '{}' and were left empty",
            csv_settings.date_format
        );
    }

    Ok((submissions, unparsed_dates))
}

/// A non-empty cell; ragged rows simply lack the trailing cells.
fn cell(record: &StringRecord, position: usize) -> Option<&str> {
    record.get(position).filter(|value| !value.is_empty())
}

fn owned_cell(record: &StringRecord, position: usize) -> Option<String> {
    cell(record, position).map(str::to_string)
}

/// Parses a date cell, `None` when it does not match `format`.
pub fn parse_date(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), format).ok()
}
