//! Application state container contract and the in-process implementation.
//!
//! The bootstrapper only relies on the [`StateContainer`] contract: an
//! asynchronous initialisation request, committable [`Mutation`]s, and a
//! subscribable mutation stream. [`MemoryStore`] implements the contract for
//! the headless binary and the test suites.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use atlas_config::StartupParameters;
use atlas_providers::{MapProvider, ProviderRegistry, ServerCollection};
use serde_json::Value;

use crate::error::StageError;
use crate::persist::{DurableStorage, UI_SETTINGS_SLOT, UiSettings};

/// Collapsed state of sidebar sections keyed by section id.
pub type SidebarState = BTreeMap<String, bool>;

/// State changes accepted by the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Selects the current server by id.
    SetCurrentServer(String),
    /// Flips the collapsed state of a sidebar section.
    ToggleSidebarSectionCollapsedState(String),
    /// Sets the collapsed state of a sidebar section explicitly.
    SetSidebarSectionCollapsedState {
        /// Section id.
        section: String,
        /// `true` when the section is collapsed.
        collapsed: bool,
    },
    /// Replaces the UI settings with a restored document.
    SetUiSettings(UiSettings),
}

impl Mutation {
    /// Type tag of the mutation.
    #[must_use]
    pub const fn mutation_type(&self) -> MutationType {
        match self {
            Self::SetCurrentServer(_) => MutationType::SetCurrentServer,
            Self::ToggleSidebarSectionCollapsedState(_) => {
                MutationType::ToggleSidebarSectionCollapsedState
            }
            Self::SetSidebarSectionCollapsedState { .. } => {
                MutationType::SetSidebarSectionCollapsedState
            }
            Self::SetUiSettings(_) => MutationType::SetUiSettings,
        }
    }
}

/// Stable type names of [`Mutation`]s, as seen by subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationType {
    /// `setCurrentServer`
    SetCurrentServer,
    /// `toggleSidebarSectionCollapsedState`
    ToggleSidebarSectionCollapsedState,
    /// `setSidebarSectionCollapsedState`
    SetSidebarSectionCollapsedState,
    /// `setUiSettings`
    SetUiSettings,
}

impl MutationType {
    /// Canonical type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetCurrentServer => "setCurrentServer",
            Self::ToggleSidebarSectionCollapsedState => "toggleSidebarSectionCollapsedState",
            Self::SetSidebarSectionCollapsedState => "setSidebarSectionCollapsedState",
            Self::SetUiSettings => "setUiSettings",
        }
    }
}

impl fmt::Display for MutationType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Snapshot of the application state.
#[derive(Debug, Default)]
pub struct AppState {
    servers: ServerCollection,
    providers: BTreeMap<String, Box<dyn MapProvider>>,
    current_server: Option<String>,
    sidebar: SidebarState,
    ui_options: Option<Value>,
    messages: Option<Value>,
}

impl AppState {
    /// Configured servers.
    #[must_use]
    pub const fn servers(&self) -> &ServerCollection {
        &self.servers
    }

    /// Id of the current server, once one has been committed.
    #[must_use]
    pub fn current_server(&self) -> Option<&str> {
        self.current_server.as_deref()
    }

    /// Provider bound to the given server.
    #[must_use]
    pub fn provider(&self, server_id: &str) -> Option<&dyn MapProvider> {
        self.providers.get(server_id).map(AsRef::as_ref)
    }

    /// Provider bound to the current server.
    #[must_use]
    pub fn current_provider(&self) -> Option<&dyn MapProvider> {
        self.current_server().and_then(|id| self.provider(id))
    }

    /// Sidebar section collapse map.
    #[must_use]
    pub const fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    /// UI options from the startup parameters.
    #[must_use]
    pub const fn ui_options(&self) -> Option<&Value> {
        self.ui_options.as_ref()
    }

    /// Message overrides from the startup parameters.
    #[must_use]
    pub const fn messages(&self) -> Option<&Value> {
        self.messages.as_ref()
    }
}

/// Observer of committed mutations.
///
/// Subscribers receive the mutation and the state after it was applied. They
/// only get shared access, so they cannot commit further mutations.
pub trait MutationSubscriber: Send + Sync {
    /// Invoked after each commit.
    fn on_mutation(&self, mutation: &Mutation, state: &AppState);
}

/// Contract the bootstrapper needs from the application state container.
pub trait StateContainer {
    /// Initialises the container with the loaded configuration.
    ///
    /// Resolves once the servers are loaded. Rejections are classified: a
    /// [`StageError::Configuration`] keeps its class, anything else is
    /// reported as generic.
    fn initialise(
        &mut self,
        parameters: &StartupParameters,
        servers: ServerCollection,
    ) -> impl Future<Output = Result<(), StageError>>;

    /// Current state.
    fn state(&self) -> &AppState;

    /// Applies a mutation and notifies subscribers.
    fn commit(&mut self, mutation: Mutation);

    /// Adds a subscriber for the rest of the process lifetime.
    fn subscribe(&mut self, subscriber: Box<dyn MutationSubscriber>);
}

/// In-process state container.
pub struct MemoryStore {
    registry: Arc<ProviderRegistry>,
    storage: Option<Arc<dyn DurableStorage>>,
    state: AppState,
    subscribers: Vec<Box<dyn MutationSubscriber>>,
}

impl MemoryStore {
    /// Creates an empty store that builds providers through `registry`.
    #[must_use]
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            storage: None,
            state: AppState::default(),
            subscribers: Vec::new(),
        }
    }

    /// Restores persisted UI settings from `storage` during initialisation.
    #[must_use]
    pub fn with_storage(mut self, storage: Arc<dyn DurableStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    fn restore_ui_settings(&self) -> Option<UiSettings> {
        let storage = self.storage.as_ref()?;
        let stored = storage
            .get_item(UI_SETTINGS_SLOT)
            .map_err(|error| {
                tracing::warn!(
                    target: "atlas_bootstrap::store",
                    error = %error,
                    "could not read persisted UI settings"
                );
            })
            .ok()
            .flatten()?;
        serde_json::from_str::<UiSettings>(&stored)
            .map_err(|error| {
                tracing::warn!(
                    target: "atlas_bootstrap::store",
                    error = %error,
                    "ignoring malformed persisted UI settings"
                );
            })
            .ok()
    }

    fn apply(&mut self, mutation: &Mutation) {
        match mutation {
            Mutation::SetCurrentServer(id) => {
                if self.state.servers.contains(id) {
                    self.state.current_server = Some(id.clone());
                } else {
                    tracing::warn!(
                        target: "atlas_bootstrap::store",
                        server = %id,
                        "ignoring unknown current server"
                    );
                }
            }
            Mutation::ToggleSidebarSectionCollapsedState(section) => {
                let collapsed = self.state.sidebar.entry(section.clone()).or_insert(false);
                *collapsed = !*collapsed;
            }
            Mutation::SetSidebarSectionCollapsedState { section, collapsed } => {
                self.state.sidebar.insert(section.clone(), *collapsed);
            }
            Mutation::SetUiSettings(settings) => {
                self.state.sidebar.clone_from(&settings.sidebar);
            }
        }
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MemoryStore")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl StateContainer for MemoryStore {
    async fn initialise(
        &mut self,
        parameters: &StartupParameters,
        servers: ServerCollection,
    ) -> Result<(), StageError> {
        let mut providers = BTreeMap::new();
        for server in servers.iter() {
            let provider = self.registry.create(server)?;
            providers.insert(server.id().to_owned(), provider);
        }

        self.state.servers = servers;
        self.state.providers = providers;
        self.state.current_server = None;
        self.state.ui_options = parameters.ui().cloned();
        self.state.messages = parameters.messages().cloned();
        if let Some(settings) = self.restore_ui_settings() {
            self.commit(Mutation::SetUiSettings(settings));
        }
        Ok(())
    }

    fn state(&self) -> &AppState {
        &self.state
    }

    fn commit(&mut self, mutation: Mutation) {
        self.apply(&mutation);
        for subscriber in &self.subscribers {
            subscriber.on_mutation(&mutation, &self.state);
        }
    }

    fn subscribe(&mut self, subscriber: Box<dyn MutationSubscriber>) {
        self.subscribers.push(subscriber);
    }
}
