use crate::error::ConfigurationError;
use crate::provider::{MapProvider, ProviderEndpoints};
use crate::server::ServerDefinition;

/// Provider for pl3xmap and squaremap web exports.
#[derive(Debug, Clone)]
pub struct Pl3xmapProvider {
    kind: String,
    server_id: String,
    endpoints: ProviderEndpoints,
}

impl Pl3xmapProvider {
    /// Builds the provider from a base URL setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidProviderSettings`] when the
    /// setting is not a non-empty string.
    pub fn from_server(server: &ServerDefinition) -> Result<Self, ConfigurationError> {
        let base = super::base_url(server)?;
        let mut endpoints = ProviderEndpoints::new();
        endpoints.insert("settings", format!("{base}tiles/settings.json"));
        endpoints.insert("tiles", format!("{base}tiles/"));
        endpoints.insert("base", base);

        Ok(Self {
            kind: server.kind().to_owned(),
            server_id: server.id().to_owned(),
            endpoints,
        })
    }
}

impl MapProvider for Pl3xmapProvider {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn server_id(&self) -> &str {
        &self.server_id
    }

    fn endpoints(&self) -> &ProviderEndpoints {
        &self.endpoints
    }
}
