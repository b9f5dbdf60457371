//! Viewer process entry: wires the built-in collaborators and runs bootstrap.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;
use tracing::{Instrument, info};

use atlas_config::{Config, read_raw_parameters};
use atlas_providers::{ProviderRegistry, register_builtin_providers};

use crate::bootstrap::Bootstrapper;
use crate::error::BootstrapError;
use crate::history::MemoryHistory;
use crate::loader::ParametersConfigLoader;
use crate::persist::{DurableStorage, FileStorage, PersistedUiStateSync};
use crate::splash::SplashScreen;
use crate::store::{MemoryStore, StateContainer};
use crate::telemetry::{self, TelemetryError};
use crate::ui::HeadlessHost;

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

/// Errors that stop the viewer process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Runtime configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Config {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry could not be initialised.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The bootstrap sequence failed; the splash screen shows the details.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
}

/// Loads the runtime configuration and runs the viewer.
///
/// # Errors
///
/// Returns [`LaunchError`] when configuration, telemetry, or bootstrap fails.
pub async fn run_viewer() -> Result<(), LaunchError> {
    let config = Config::load().map_err(|source| LaunchError::Config { source })?;
    run_with_config(&config).await
}

/// Runs the viewer with an already loaded configuration.
///
/// Registers the built-in providers, backs the UI settings with files under
/// [`Config::storage_dir`], and starts the history at [`Config::location`].
/// The startup parameters file is read here; an absent or malformed file
/// reaches the splash screen as a configuration problem and an unreadable
/// one as a general load failure.
///
/// # Errors
///
/// Returns [`LaunchError::Telemetry`] or [`LaunchError::Bootstrap`].
pub async fn run_with_config(config: &Config) -> Result<(), LaunchError> {
    let handle =
        telemetry::initialise(config).map_err(|source| LaunchError::Telemetry { source })?;
    launch(config).instrument(handle.span().clone()).await
}

async fn launch(config: &Config) -> Result<(), LaunchError> {
    info!(
        target: PROCESS_TARGET,
        "{} v{}",
        config.app_name(),
        env!("CARGO_PKG_VERSION")
    );

    let registry = builtin_registry();
    let storage: Arc<dyn DurableStorage> = Arc::new(FileStorage::new(config.storage_dir()));
    let mut store = MemoryStore::new(Arc::clone(&registry)).with_storage(Arc::clone(&storage));
    PersistedUiStateSync::install(&mut store, storage);

    let history = MemoryHistory::new(config.location());
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();

    let mounted = Bootstrapper::new(
        config.app_name(),
        ParametersConfigLoader::new(registry),
        store,
        &history,
        &host,
        &splash,
    )
    .run_from_document(read_raw_parameters(config.startup_parameters()))
    .await
    .into_result()?;

    info!(
        target: PROCESS_TARGET,
        location = %history.current(),
        mount_target = %mounted.target().id(),
        servers = mounted.store().state().servers().len(),
        "viewer ready"
    );
    Ok(())
}

fn builtin_registry() -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    register_builtin_providers(&mut registry);
    Arc::new(registry)
}
