//! Turns the raw startup parameters into a validated server collection.

use std::sync::Arc;

use atlas_config::StartupParameters;
use atlas_providers::{ConfigurationError, ProviderRegistry, ServerCollection, load_servers};
use serde_json::Value;

use crate::error::StageError;

/// Startup parameters together with the servers they describe.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// Parsed startup parameters.
    pub parameters: StartupParameters,
    /// Servers in document order.
    pub servers: ServerCollection,
}

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader {
    /// Loads the configuration from the raw startup parameters.
    ///
    /// Validation failures must be reported as
    /// [`StageError::Configuration`].
    fn load(&self, raw: Value) -> impl Future<Output = Result<LoadedConfig, StageError>>;
}

/// Loader that validates the parameters against a provider registry.
#[derive(Debug, Clone)]
pub struct ParametersConfigLoader {
    registry: Arc<ProviderRegistry>,
}

impl ParametersConfigLoader {
    /// Builds a loader resolving server kinds through `registry`.
    #[must_use]
    pub const fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    fn load_now(&self, raw: Value) -> Result<LoadedConfig, ConfigurationError> {
        let parameters =
            StartupParameters::from_value(raw).map_err(ConfigurationError::Parameters)?;
        let servers = load_servers(&parameters, &self.registry)?;
        Ok(LoadedConfig {
            parameters,
            servers,
        })
    }
}

impl ConfigLoader for ParametersConfigLoader {
    async fn load(&self, raw: Value) -> Result<LoadedConfig, StageError> {
        Ok(self.load_now(raw)?)
    }
}

/// Loader returning a fixed result, used to exercise the bootstrapper.
#[derive(Debug)]
pub struct StaticConfigLoader {
    result: std::sync::Mutex<Option<Result<LoadedConfig, StageError>>>,
}

impl StaticConfigLoader {
    /// Builds a loader that yields `result` on its first call.
    #[must_use]
    pub const fn new(result: Result<LoadedConfig, StageError>) -> Self {
        Self {
            result: std::sync::Mutex::new(Some(result)),
        }
    }
}

impl ConfigLoader for StaticConfigLoader {
    async fn load(&self, _raw: Value) -> Result<LoadedConfig, StageError> {
        self.result
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| Err(StageError::generic("configuration was already loaded")))
    }
}

#[cfg(test)]
mod tests {
    use atlas_providers::register_builtin_providers;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::error::FailureKind;

    #[fixture]
    fn loader() -> ParametersConfigLoader {
        let mut registry = ProviderRegistry::new();
        register_builtin_providers(&mut registry);
        ParametersConfigLoader::new(Arc::new(registry))
    }

    #[rstest]
    #[tokio::test]
    async fn loads_servers_from_parameters(loader: ParametersConfigLoader) {
        let raw = json!({
            "servers": {
                "main": { "pl3xmap": "https://map.example.com/" },
                "old": { "overviewer": "https://old.example.com/" }
            },
            "ui": { "compass": true }
        });

        let loaded = loader.load(raw).await.expect("parameters load");

        assert_eq!(loaded.servers.ids().collect::<Vec<_>>(), ["main", "old"]);
        assert_eq!(loaded.parameters.ui(), Some(&json!({ "compass": true })));
    }

    #[rstest]
    #[case::missing(Value::Null)]
    #[case::malformed(json!({ "servers": [] }))]
    #[case::no_servers(json!({ "servers": {} }))]
    #[case::unknown_kind(json!({ "servers": { "main": { "bluemap": "u" } } }))]
    #[tokio::test]
    async fn validation_failures_are_configuration_class(
        loader: ParametersConfigLoader,
        #[case] raw: Value,
    ) {
        let error = loader.load(raw).await.expect_err("must be rejected");
        assert_eq!(error.kind(), FailureKind::Configuration);
    }

    #[tokio::test]
    async fn static_loader_yields_its_result_once() {
        let loader = StaticConfigLoader::new(Err(StageError::generic("offline")));

        let first = loader.load(Value::Null).await.expect_err("fixed failure");
        assert_eq!(first.to_string(), "offline");
        let second = loader.load(Value::Null).await.expect_err("exhausted");
        assert_eq!(second.to_string(), "configuration was already loaded");
    }
}
