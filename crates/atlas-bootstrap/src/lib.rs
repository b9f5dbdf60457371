//! Bootstrap core for the Atlas live-map viewer.
//!
//! The viewer shows one of several configured map servers. At startup it
//! validates the startup parameters against the registered map providers,
//! initialises the application state, picks the current server from the
//! address, and mounts the UI. A failing step replaces the UI with a splash
//! error whose prefix tells configuration mistakes apart from other failures.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use atlas_bootstrap::{
//!     Bootstrapper, HeadlessHost, MemoryHistory, MemoryStore, ParametersConfigLoader,
//!     SplashScreen,
//! };
//! use atlas_providers::{ProviderRegistry, register_builtin_providers};
//! use serde_json::json;
//!
//! # async fn run() {
//! let mut registry = ProviderRegistry::new();
//! register_builtin_providers(&mut registry);
//! let registry = Arc::new(registry);
//!
//! let history = MemoryHistory::new("/maps/creative");
//! let host = HeadlessHost::new();
//! let splash = SplashScreen::new();
//! let outcome = Bootstrapper::new(
//!     "LiveAtlas",
//!     ParametersConfigLoader::new(Arc::clone(&registry)),
//!     MemoryStore::new(registry),
//!     &history,
//!     &host,
//!     &splash,
//! )
//! .run(json!({
//!     "servers": {
//!         "survival": { "pl3xmap": "https://survival.example.com/" },
//!         "creative": { "squaremap": "https://creative.example.com/" }
//!     }
//! }))
//! .await;
//! assert!(outcome.is_mounted());
//! # }
//! ```
//!
//! Lifecycle events are emitted through a [`HealthReporter`]; the default
//! [`StructuredHealthReporter`] writes them as `tracing` events under the
//! `atlas_bootstrap::health` target.

mod bootstrap;
mod error;
mod health;
mod history;
mod loader;
mod persist;
mod process;
mod resolver;
mod splash;
mod store;
pub mod telemetry;
mod ui;

pub use bootstrap::{BootstrapOutcome, Bootstrapper};
pub use error::{BootstrapError, BootstrapStage, FailureKind, StageError};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use history::{History, Location, MemoryHistory, apply_resolution};
pub use loader::{ConfigLoader, LoadedConfig, ParametersConfigLoader, StaticConfigLoader};
pub use persist::{
    DurableStorage, FileStorage, PERSISTED_MUTATIONS, PersistedUiStateSync, StorageError,
    UI_SETTINGS_SLOT, UiSettings,
};
pub use process::{LaunchError, run_viewer, run_with_config};
pub use resolver::{Resolution, UrlUpdate, resolve};
pub use splash::{ErrorSurface, SplashError, SplashScreen};
pub use store::{
    AppState, MemoryStore, Mutation, MutationSubscriber, MutationType, SidebarState,
    StateContainer,
};
pub use ui::{
    HeadlessHost, MOUNT_TARGET_ID, MountError, MountHost, MountTarget, MountedUi, UI_PLUGINS,
    UiPlugin, UiRoot,
};

#[cfg(test)]
mod tests;
