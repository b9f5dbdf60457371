//! The map provider abstraction and the factories that build providers.
//!
//! A [`MapProvider`] speaks the protocol of one kind of map backend for one
//! configured server. Providers are created through a [`ProviderFactory`],
//! which the [`ProviderRegistry`](crate::ProviderRegistry) stores under one or
//! more kind identifiers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::server::ServerDefinition;

/// A backend protocol implementation bound to a single server.
pub trait MapProvider: fmt::Debug + Send + Sync {
    /// Kind identifier the provider was created for.
    fn kind(&self) -> &str;

    /// Id of the server the provider talks to.
    fn server_id(&self) -> &str;

    /// Named endpoints the provider fetches map data from.
    fn endpoints(&self) -> &ProviderEndpoints;
}

/// Named backend endpoints, e.g. `markers` → `up/world/markers.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderEndpoints {
    urls: BTreeMap<String, String>,
}

impl ProviderEndpoints {
    /// Creates an empty endpoint set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an endpoint.
    pub fn insert(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.urls.insert(name.into(), url.into());
    }

    /// Looks up an endpoint by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.urls.get(name).map(String::as_str)
    }

    /// Iterates endpoints in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.urls
            .iter()
            .map(|(name, url)| (name.as_str(), url.as_str()))
    }

    /// Number of endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// Returns `true` when no endpoint is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

type BuildFn =
    dyn Fn(&ServerDefinition) -> Result<Box<dyn MapProvider>, ConfigurationError> + Send + Sync;

/// Shared constructor producing a provider for a server definition.
///
/// Cloning a factory is cheap and yields a handle to the same constructor.
#[derive(Clone)]
pub struct ProviderFactory {
    build: Arc<BuildFn>,
}

impl ProviderFactory {
    /// Wraps a constructor closure.
    #[must_use]
    pub fn new<F>(build: F) -> Self
    where
        F: Fn(&ServerDefinition) -> Result<Box<dyn MapProvider>, ConfigurationError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            build: Arc::new(build),
        }
    }

    /// Builds a provider for the given server.
    ///
    /// # Errors
    ///
    /// Returns the provider's [`ConfigurationError`] when it rejects the
    /// server's settings.
    pub fn create(
        &self,
        server: &ServerDefinition,
    ) -> Result<Box<dyn MapProvider>, ConfigurationError> {
        (self.build)(server)
    }

    /// Returns `true` when both handles wrap the same constructor.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }
}

impl fmt::Debug for ProviderFactory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ProviderFactory")
            .finish_non_exhaustive()
    }
}
