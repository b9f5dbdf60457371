//! Server definitions and the loader that builds them from startup parameters.
//!
//! A server entry in the startup parameters names its backend kind by
//! carrying a property whose key is a registered provider kind:
//!
//! ```json
//! { "label": "Survival", "dynmap": { "configuration": "up/configuration" } }
//! ```
//!
//! [`load_servers`] turns the entries into an ordered [`ServerCollection`].
//! Insertion order follows the document and decides which server is used when
//! the address does not name one.

use atlas_config::StartupParameters;
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::ConfigurationError;
use crate::registry::ProviderRegistry;

/// Id and kind given to the server synthesised from legacy dynmap settings.
pub const LEGACY_DYNMAP_SERVER: &str = "dynmap";

const LABEL_KEY: &str = "label";

/// One configured backend server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerDefinition {
    id: String,
    kind: String,
    label: String,
    settings: Value,
}

impl ServerDefinition {
    /// Builds a definition labelled with its own id.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>, settings: Value) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind: kind.into(),
            settings,
        }
    }

    /// Replaces the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Unique server id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Provider kind identifier.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Human-readable name.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Provider-specific settings block.
    #[must_use]
    pub const fn settings(&self) -> &Value {
        &self.settings
    }
}

/// Ordered collection of servers keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerCollection {
    servers: IndexMap<String, ServerDefinition>,
}

impl ServerCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a server, replacing any server with the same id in place.
    pub fn insert(&mut self, server: ServerDefinition) -> Option<ServerDefinition> {
        self.servers.insert(server.id().to_owned(), server)
    }

    /// Looks up a server by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ServerDefinition> {
        self.servers.get(id)
    }

    /// Returns `true` when a server with exactly this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.servers.contains_key(id)
    }

    /// First server in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<&ServerDefinition> {
        self.servers.values().next()
    }

    /// Server ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    /// Servers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ServerDefinition> {
        self.servers.values()
    }

    /// Number of servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns `true` when no server is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

impl FromIterator<ServerDefinition> for ServerCollection {
    fn from_iter<I: IntoIterator<Item = ServerDefinition>>(iter: I) -> Self {
        let mut collection = Self::new();
        for server in iter {
            collection.insert(server);
        }
        collection
    }
}

/// Builds the server collection described by the startup parameters.
///
/// When `servers` is empty but legacy dynmap settings are present, a single
/// server named [`LEGACY_DYNMAP_SERVER`] is produced from them. When an entry
/// carries properties for several registered kinds, the kind registered last
/// wins.
///
/// # Errors
///
/// Returns [`ConfigurationError::NoServers`] when nothing is configured,
/// [`ConfigurationError::MissingServerConfig`] for empty or non-object
/// entries, and [`ConfigurationError::NoSupportedKind`] when an entry names no
/// registered kind.
pub fn load_servers(
    parameters: &StartupParameters,
    registry: &ProviderRegistry,
) -> Result<ServerCollection, ConfigurationError> {
    if !parameters.servers().is_empty() {
        return parameters
            .servers()
            .iter()
            .map(|(id, entry)| server_from_entry(id, entry, registry))
            .collect();
    }

    parameters
        .legacy_dynmap()
        .map(|settings| {
            std::iter::once(ServerDefinition::new(
                LEGACY_DYNMAP_SERVER,
                LEGACY_DYNMAP_SERVER,
                settings.clone(),
            ))
            .collect::<ServerCollection>()
        })
        .ok_or(ConfigurationError::NoServers)
}

fn server_from_entry(
    id: &str,
    entry: &Value,
    registry: &ProviderRegistry,
) -> Result<ServerDefinition, ConfigurationError> {
    let Some(fields) = entry.as_object().filter(|fields| !fields.is_empty()) else {
        return Err(ConfigurationError::MissingServerConfig {
            server: id.to_owned(),
        });
    };

    let (kind, settings) = registry
        .kinds()
        .filter_map(|kind| fields.get(kind).map(|settings| (kind, settings)))
        .last()
        .ok_or_else(|| ConfigurationError::NoSupportedKind {
            server: id.to_owned(),
        })?;

    let label = fields.get(LABEL_KEY).and_then(Value::as_str).unwrap_or(id);
    Ok(ServerDefinition::new(id, kind, settings.clone()).with_label(label))
}
