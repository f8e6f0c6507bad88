use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisSettings, ColumnNames, CsvSettings, Encoding, LoggingSettings, OutputFormat,
    OutputSettings,
};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "gedscope.toml";

/// Prefix of environment overrides, e.g. `GEDSCOPE__CSV__ENCODING=utf8`.
pub const ENV_PREFIX: &str = "GEDSCOPE";

/// Loads the application configuration.
///
/// Sources, lowest priority first: built-in defaults, the TOML file, then
/// `GEDSCOPE__SECTION__KEY` environment variables. An explicit `path` must
/// exist; the default `gedscope.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
