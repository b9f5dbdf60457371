//! Provider registry keyed by backend kind.
//!
//! The [`ProviderRegistry`] maps kind identifiers such as `dynmap` to the
//! [`ProviderFactory`] that builds providers for that kind. One factory may be
//! registered under several identifiers to alias a backend that speaks the same
//! protocol under another name.
//!
//! Registering a kind that is already present replaces the previous factory.
//! The replacement is logged at debug level but is not an error. Looking up a
//! kind nobody registered fails with
//! [`ConfigurationError::UnknownProvider`]; there is no default provider.

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::ConfigurationError;
use crate::provider::{MapProvider, ProviderFactory};
use crate::server::ServerDefinition;

/// Registry of provider factories keyed by kind identifier.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    factories: IndexMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `kind`, replacing any previous registration.
    ///
    /// A replaced kind keeps its original position in [`kinds`](Self::kinds).
    pub fn register(&mut self, kind: impl Into<String>, factory: ProviderFactory) {
        match self.factories.entry(kind.into()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(
                    target: "atlas_providers::registry",
                    kind = %entry.key(),
                    "replacing previously registered map provider"
                );
                entry.insert(factory);
            }
            Entry::Vacant(entry) => {
                entry.insert(factory);
            }
        }
    }

    /// Looks up the factory registered under `kind`.
    ///
    /// Kind identifiers are matched exactly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownProvider`] when nothing is
    /// registered under `kind`.
    pub fn resolve(&self, kind: &str) -> Result<&ProviderFactory, ConfigurationError> {
        self.factories
            .get(kind)
            .ok_or_else(|| ConfigurationError::UnknownProvider {
                kind: kind.to_owned(),
            })
    }

    /// Builds the provider for a server using the factory of its kind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownProvider`] for unregistered kinds,
    /// or the provider's own error when it rejects the server's settings.
    pub fn create(
        &self,
        server: &ServerDefinition,
    ) -> Result<Box<dyn MapProvider>, ConfigurationError> {
        self.resolve(server.kind())?.create(server)
    }

    /// Returns `true` when a factory is registered under `kind`.
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kind identifiers in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` when no kinds are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
