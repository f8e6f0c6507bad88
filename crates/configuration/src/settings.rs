use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Write;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `gedscope.toml`; omitted keys fall back to the
/// conventions of the GED exports (semicolon separated, ISO-8859-1, French headers).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv: CsvSettings,
    pub columns: ColumnNames,
    pub analysis: AnalysisSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

impl Config {
    /// Checks the invariants the loaders rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.csv.delimiter_byte()?;
        if self.csv.date_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "csv.date_format must not be empty".to_string(),
            ));
        }
        // Dates are printed back with the same format, so it may only use date fields.
        let mut sample = String::new();
        if write!(sample, "{}", NaiveDate::default().format(&self.csv.date_format)).is_err() {
            return Err(ConfigError::ValidationError(format!(
                "csv.date_format {:?} cannot format a calendar date",
                self.csv.date_format
            )));
        }
        for (key, header) in self.columns.entries() {
            if header.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Text encoding of the input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// ISO-8859-1, the encoding of GED exports.
    #[default]
    #[serde(alias = "iso-8859-1", alias = "latin-1")]
    Latin1,
    #[serde(alias = "utf-8")]
    Utf8,
}

/// How the CSV files are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CsvSettings {
    /// Field separator. Must be a single ASCII character.
    pub delimiter: String,
    pub encoding: Encoding,
    /// chrono format string of the submission date column.
    pub date_format: String,
}

impl CsvSettings {
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::ValidationError(format!(
                "csv.delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            encoding: Encoding::Latin1,
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

/// Header names of the seven columns read from each export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub submitted_on: String,
    pub document_type: String,
    pub project: String,
    pub emitter: String,
    pub lot: String,
    pub indice: String,
    pub label: String,
}

impl ColumnNames {
    /// `(config key, header)` pairs, in file order of a standard export.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("submitted_on", self.submitted_on.as_str()),
            ("document_type", self.document_type.as_str()),
            ("project", self.project.as_str()),
            ("emitter", self.emitter.as_str()),
            ("lot", self.lot.as_str()),
            ("indice", self.indice.as_str()),
            ("label", self.label.as_str()),
        ]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            submitted_on: "Date dépôt GED".to_string(),
            document_type: "TYPE DE DOCUMENT".to_string(),
            project: "PROJET".to_string(),
            emitter: "EMET".to_string(),
            lot: "LOT".to_string(),
            indice: "INDICE".to_string(),
            label: "Libellé du document".to_string(),
        }
    }
}

/// Knobs of the enrichment step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Report a missing interval between versions as 0 days instead of leaving it empty.
    /// Filled zeros take part in the per-type means.
    pub fill_missing_intervals: bool,
}

/// How reports are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    /// Semicolon separated values, for row-shaped reports.
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Decimal places for means and correlation coefficients.
    pub decimals: usize,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            decimals: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Also append logs to this file when set.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_ged_exports() {
        let config = Config::default();
        assert_eq!(config.csv.delimiter_byte().unwrap(), b';');
        assert_eq!(config.csv.encoding, Encoding::Latin1);
        assert_eq!(config.csv.date_format, "%d/%m/%Y");
        assert_eq!(config.columns.label, "Libellé du document");
        assert!(!config.analysis.fill_missing_intervals);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_multi_character_delimiter() {
        let mut config = Config::default();
        config.csv.delimiter = ";;".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        config.csv.delimiter = "§".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_date_format_with_time_fields() {
        let mut config = Config::default();
        config.csv.date_format = "%d/%m/%Y %H:%M".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("csv.date_format"));

        config.csv.date_format = "%Y-%m-%d".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_header_name() {
        let mut config = Config::default();
        config.columns.lot = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("columns.lot"));
    }
}
