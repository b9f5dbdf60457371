//! Startup parameters describing the servers the viewer displays.
//!
//! The document mirrors the configuration object embedded in the viewer's
//! entry page:
//!
//! ```json
//! {
//!   "servers": {
//!     "survival": { "label": "Survival", "dynmap": { "configuration": "..." } },
//!     "creative": { "squaremap": "https://creative.example.com/" }
//!   },
//!   "ui": { "playersAboveMarkers": true },
//!   "messages": { "chatTitle": "Chat" }
//! }
//! ```
//!
//! Entries in `servers` are kept in document order; the first entry is the
//! fallback server when the address names none. Entry contents are opaque
//! here and validated by the provider layer.
//!
//! Deployments that predate multi-server support omit `servers` and give the
//! dynmap endpoint set under `dynmap_url` instead:
//!
//! ```json
//! { "dynmap_url": { "configuration": "up/configuration", "tiles": "tiles/" } }
//! ```

use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Parsed startup parameters. Constructed once and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupParameters {
    #[serde(default)]
    servers: IndexMap<String, Value>,
    #[serde(default, rename = "dynmap_url", skip_serializing_if = "Option::is_none")]
    legacy_dynmap: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ui: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    messages: Option<Value>,
}

impl StartupParameters {
    /// Builds parameters from an ordered set of server entries.
    #[must_use]
    pub fn with_servers(servers: IndexMap<String, Value>) -> Self {
        Self {
            servers,
            ..Self::default()
        }
    }

    /// Sets the legacy single-server dynmap settings.
    #[must_use]
    pub fn with_legacy_dynmap(mut self, settings: Value) -> Self {
        self.legacy_dynmap = Some(settings);
        self
    }

    /// Interprets a raw configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`ParametersError::Missing`] when the value is `null` (no
    /// configuration was supplied) and [`ParametersError::Malformed`] when it
    /// does not have the expected shape.
    pub fn from_value(raw: Value) -> Result<Self, ParametersError> {
        if raw.is_null() {
            return Err(ParametersError::Missing);
        }
        serde_json::from_value(raw).map_err(|source| ParametersError::Malformed {
            source: Arc::new(source),
        })
    }

    /// Server entries keyed by server id, in document order.
    #[must_use]
    pub const fn servers(&self) -> &IndexMap<String, Value> {
        &self.servers
    }

    /// Dynmap endpoints of a pre-multi-server deployment (`dynmap_url`), if
    /// present.
    #[must_use]
    pub const fn legacy_dynmap(&self) -> Option<&Value> {
        self.legacy_dynmap.as_ref()
    }

    /// Opaque UI options forwarded to the state container.
    #[must_use]
    pub const fn ui(&self) -> Option<&Value> {
        self.ui.as_ref()
    }

    /// Opaque message overrides forwarded to the state container.
    #[must_use]
    pub const fn messages(&self) -> Option<&Value> {
        self.messages.as_ref()
    }
}

/// Reads the raw startup parameters document.
///
/// The value is returned unparsed so that shape validation happens inside the
/// bootstrap sequence, where failures are reported to the user.
///
/// # Errors
///
/// Returns [`ParametersError::Missing`] when no file exists at `path`,
/// [`ParametersError::Read`] when it exists but cannot be read, and
/// [`ParametersError::Syntax`] when it is not valid JSON.
pub fn read_raw_parameters(path: &Utf8Path) -> Result<Value, ParametersError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            return Err(ParametersError::Missing);
        }
        Err(source) => {
            return Err(ParametersError::Read {
                path: path.to_path_buf(),
                source: Arc::new(source),
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| ParametersError::Syntax {
        path: path.to_path_buf(),
        source: Arc::new(source),
    })
}

/// Errors raised while reading or interpreting startup parameters.
#[derive(Debug, Clone, Error)]
pub enum ParametersError {
    /// No configuration was supplied at all.
    #[error(
        "No configuration found.\nCheck for any syntax errors in your configuration. \
         The log output may contain additional information."
    )]
    Missing,
    /// The configuration does not have the expected shape.
    #[error("configuration is malformed: {source}")]
    Malformed {
        /// Underlying deserialisation error.
        #[source]
        source: Arc<serde_json::Error>,
    },
    /// The parameters file exists but could not be read.
    #[error("failed to read startup parameters '{path}': {source}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },
    /// The parameters file is not valid JSON.
    #[error("startup parameters '{path}' are not valid JSON: {source}")]
    Syntax {
        /// File that was parsed.
        path: Utf8PathBuf,
        /// Underlying parse error.
        #[source]
        source: Arc<serde_json::Error>,
    },
}
