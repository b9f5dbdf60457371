//! Shared configuration for the Atlas viewer bootstrap.
//!
//! Two documents configure a viewer process. The runtime [`Config`] is layered
//! through `ortho_config` (defaults, configuration file, `ATLAS_*` environment
//! variables, then command-line flags) and covers logging, the application
//! name used in user-facing messages, and where the startup parameters and the
//! durable UI settings live. The [`StartupParameters`] document describes the
//! map servers the viewer should display; it is read exactly once and never
//! mutated afterwards.

mod defaults;
mod logging;
mod parameters;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_APP_NAME, DEFAULT_LOCATION, DEFAULT_LOG_FILTER, DEFAULT_PARAMETERS_FILE,
    default_log_filter, default_log_filter_string, default_log_format, default_storage_dir,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use parameters::{ParametersError, StartupParameters, read_raw_parameters};

/// Runtime configuration for the viewer process.
///
/// Load it with `Config::load()`, which merges every layer and reports the
/// aggregated `ortho_config` error when any of them is malformed. Each field
/// carries its built-in default as the lowest layer, so a process started
/// without any configuration file, `ATLAS_*` variable or flag still loads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "ATLAS")]
pub struct Config {
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Application name used in log banners and splash messages.
    #[ortho_config(default = String::from(DEFAULT_APP_NAME))]
    pub app_name: String,
    /// Path of the startup parameters JSON document.
    #[ortho_config(default = Utf8PathBuf::from(DEFAULT_PARAMETERS_FILE))]
    pub startup_parameters: Utf8PathBuf,
    /// Directory backing the durable UI settings slot.
    #[ortho_config(default = default_storage_dir())]
    pub storage_dir: Utf8PathBuf,
    /// Address the viewer was opened at, e.g. `/maps/survival#world`.
    #[ortho_config(default = String::from(DEFAULT_LOCATION))]
    pub location: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            app_name: String::from(DEFAULT_APP_NAME),
            startup_parameters: Utf8PathBuf::from(DEFAULT_PARAMETERS_FILE),
            storage_dir: default_storage_dir(),
            location: String::from(DEFAULT_LOCATION),
        }
    }
}

impl Config {
    /// Filter expression handed to the log subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Selected log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Application name, `LiveAtlas` unless overridden.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Location of the startup parameters document.
    #[must_use]
    pub fn startup_parameters(&self) -> &Utf8Path {
        &self.startup_parameters
    }

    /// Directory used for durable storage.
    #[must_use]
    pub fn storage_dir(&self) -> &Utf8Path {
        &self.storage_dir
    }

    /// Address the viewer was opened at.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}
