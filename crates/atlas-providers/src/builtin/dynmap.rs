use serde_json::Value;

use crate::error::ConfigurationError;
use crate::provider::{MapProvider, ProviderEndpoints};
use crate::server::ServerDefinition;

const REQUIRED_URLS: [&str; 5] = ["configuration", "update", "sidebar", "markers", "tiles"];
const OPTIONAL_URLS: [&str; 2] = ["login", "register"];

/// Provider for dynmap's standalone web endpoints.
///
/// The settings block is an object of endpoint URLs. Every URL in
/// `REQUIRED_URLS` must be present; `login` and `register` are only used when
/// the server has web login enabled.
#[derive(Debug, Clone)]
pub struct DynmapProvider {
    kind: String,
    server_id: String,
    endpoints: ProviderEndpoints,
}

impl DynmapProvider {
    /// Validates the server's settings and builds the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidProviderSettings`] when the
    /// settings are not an object or a required URL is missing or not a
    /// string.
    pub fn from_server(server: &ServerDefinition) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| {
            ConfigurationError::invalid_settings(server.id(), server.kind(), message)
        };
        let Value::Object(urls) = server.settings() else {
            return Err(invalid(String::from("expected an object of endpoint URLs")));
        };

        let mut endpoints = ProviderEndpoints::new();
        for name in REQUIRED_URLS {
            let Some(url) = urls.get(name).and_then(Value::as_str) else {
                return Err(invalid(format!("missing '{name}' URL")));
            };
            endpoints.insert(name, url);
        }
        for name in OPTIONAL_URLS {
            if let Some(url) = urls.get(name).and_then(Value::as_str) {
                endpoints.insert(name, url);
            }
        }

        Ok(Self {
            kind: server.kind().to_owned(),
            server_id: server.id().to_owned(),
            endpoints,
        })
    }

    /// Returns `true` when the server exposes web login endpoints.
    #[must_use]
    pub fn supports_login(&self) -> bool {
        self.endpoints.get("login").is_some()
    }
}

impl MapProvider for DynmapProvider {
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
