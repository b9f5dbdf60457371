//! Chooses the current server from the configured collection and the address.
//!
//! With several servers the last path segment names the current one, e.g.
//! `/maps/creative` selects `creative`. A missing or unknown segment falls back
//! to the first configured server and the address is rewritten to name it.
//! Single-server deployments never carry a server segment.
//!
//! Resolution is a pure decision: it returns a [`Resolution`] describing the
//! chosen server and any address change, and leaves applying that change to
//! [`crate::history::apply_resolution`].

use atlas_providers::{ConfigurationError, ServerCollection};

/// Address change required after resolution. Paths exclude the fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlUpdate {
    /// The address already matches the selection.
    Unchanged,
    /// The selection matched, but a trailing `/` was trimmed from the path.
    TrimTrailingSlash {
        /// Path without the trailing `/`.
        path: String,
    },
    /// The path did not name a known server and must be rewritten.
    Rewrite {
        /// Path naming the selected server.
        path: String,
    },
}

/// Outcome of server resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    server_id: String,
    url: UrlUpdate,
}

impl Resolution {
    /// Id of the selected server.
    #[must_use]
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Address change to apply.
    #[must_use]
    pub const fn url_update(&self) -> &UrlUpdate {
        &self.url
    }

    /// Returns `true` when the path must be rewritten to name the server.
    #[must_use]
    pub const fn url_rewrite_required(&self) -> bool {
        matches!(self.url, UrlUpdate::Rewrite { .. })
    }
}

/// Selects the current server for `current_path`.
///
/// Server ids are matched exactly. A path segment that happens to equal a
/// server id is always taken as naming that server.
///
/// # Errors
///
/// Returns [`ConfigurationError::NoServers`] when the collection is empty.
pub fn resolve(
    servers: &ServerCollection,
    current_path: &str,
) -> Result<Resolution, ConfigurationError> {
    let first = servers.first().ok_or(ConfigurationError::NoServers)?;

    if servers.len() == 1 {
        return Ok(Resolution {
            server_id: first.id().to_owned(),
            url: UrlUpdate::Unchanged,
        });
    }

    let trimmed = current_path.strip_suffix('/');
    let path = trimmed.unwrap_or(current_path);
    let last_segment = path.split('/').rfind(|segment| !segment.is_empty());

    let selected = last_segment.filter(|segment| servers.contains(segment));
    Ok(selected.map_or_else(
        || Resolution {
            server_id: first.id().to_owned(),
            url: UrlUpdate::Rewrite {
                path: format!("{path}/{}", first.id()),
            },
        },
        |segment| Resolution {
            server_id: segment.to_owned(),
            url: trimmed.map_or(UrlUpdate::Unchanged, |trimmed_path| {
                UrlUpdate::TrimTrailingSlash {
                    path: trimmed_path.to_owned(),
                }
            }),
        },
    ))
}
