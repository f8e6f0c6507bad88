use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not valid UTF-8 (byte offset {offset}); try csv.encoding = \"latin1\"")]
    Encoding { path: PathBuf, offset: usize },

    #[error("Malformed CSV in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("'{path}' has no column named '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error(transparent)]
    Config(#[from] configuration::error::ConfigError),

    #[error("No project files were loaded")]
    NoProjects,

    #[error("Unknown project '{name}' (loaded: {available})")]
    UnknownProject { name: String, available: String },
}
