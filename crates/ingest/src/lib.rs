//! # GED export ingestion
//!
//! Turns semicolon separated GED exports into `Submission` records.
//!
//! - Decoding is explicit (`csv.encoding`): exports are ISO-8859-1 by default.
//! - Columns are located by header name, so column order does not matter.
//! - Unparseable dates become missing values and are counted, never rejected.

pub mod decode;
pub mod error;
pub mod project_set;
pub mod reader;

pub use error::IngestError;
pub use project_set::ProjectSet;
pub use reader::{Dataset, load_file, parse_submissions};

use configuration::{ColumnNames, CsvSettings};
use std::path::Path;

/// Loads every file in order into a `ProjectSet`.
///
/// `on_loaded` is called after each file, e.g. to advance a progress bar.
/// The first failing file aborts the load.
pub fn load_files<P: AsRef<Path>>(
    paths: &[P],
    csv_settings: &CsvSettings,
    columns: &ColumnNames,
    mut on_loaded: impl FnMut(&Dataset),
) -> Result<ProjectSet, IngestError> {
    let mut projects = ProjectSet::new();
    for path in paths {
        let dataset = load_file(path.as_ref(), csv_settings, columns)?;
        on_loaded(&dataset);
        projects.insert(dataset);
    }
    Ok(projects)
}
