use crate::error::ConfigurationError;
use crate::provider::{MapProvider, ProviderEndpoints};
use crate::server::ServerDefinition;

/// Provider for Overviewer renders.
#[derive(Debug, Clone)]
pub struct OverviewerProvider {
    kind: String,
    server_id: String,
    endpoints: ProviderEndpoints,
}

impl OverviewerProvider {
    /// Builds the provider from a base URL setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidProviderSettings`] when the
    /// setting is not a non-empty string.
    pub fn from_server(server: &ServerDefinition) -> Result<Self, ConfigurationError> {
        let base = super::base_url(server)?;
        let mut endpoints = ProviderEndpoints::new();
        endpoints.insert("configuration", format!("{base}overviewerConfig.js"));
        endpoints.insert("base", base);

        Ok(Self {
            kind: server.kind().to_owned(),
            server_id: server.id().to_owned(),
            endpoints,
        })
    }
}

impl MapProvider for OverviewerProvider {
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
