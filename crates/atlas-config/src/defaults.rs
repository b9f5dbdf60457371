use camino::Utf8PathBuf;
use std::env;

use crate::logging::LogFormat;

/// Application name shown in splash messages when none is configured.
pub const DEFAULT_APP_NAME: &str = "LiveAtlas";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Startup parameters document read when no path is configured.
pub const DEFAULT_PARAMETERS_FILE: &str = "atlas.json";

/// Location assumed when the viewer is opened without an explicit address.
pub const DEFAULT_LOCATION: &str = "/";

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter used as the configuration default.
#[must_use]
pub fn default_log_filter_string() -> String {
    String::from(DEFAULT_LOG_FILTER)
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Computes the directory holding durable UI settings.
///
/// Prefers the platform data directory and falls back to the temporary
/// directory when none is available.
#[must_use]
pub fn default_storage_dir() -> Utf8PathBuf {
    let mut base = dirs::data_dir()
        .and_then(|path| Utf8PathBuf::from_path_buf(path).ok())
        .unwrap_or_else(fallback_base_directory);
    base.push("atlas");
    base
}

fn fallback_base_directory() -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(env::temp_dir()).unwrap_or_else(|_| Utf8PathBuf::from("/tmp"))
}
