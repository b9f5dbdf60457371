//! Test doubles shared by the bootstrap unit and behaviour suites.

use std::sync::{Arc, Mutex};

use atlas_config::StartupParameters;
use atlas_providers::{ProviderRegistry, ServerCollection, register_builtin_providers};
use serde_json::{Map, Value, json};

use crate::error::{BootstrapError, BootstrapStage, FailureKind, StageError};
use crate::health::HealthReporter;
use crate::persist::{DurableStorage, StorageError};
use crate::resolver::Resolution;
use crate::store::{AppState, Mutation, MutationSubscriber, StateContainer};

/// Registry with the built-in providers.
pub fn builtin_registry() -> Arc<ProviderRegistry> {
    let mut registry = ProviderRegistry::new();
    register_builtin_providers(&mut registry);
    Arc::new(registry)
}

/// Startup parameters with one pl3xmap server per id, in the given order.
pub fn parameters_for(ids: &[&str]) -> Value {
    let servers: Map<String, Value> = ids
        .iter()
        .map(|id| {
            (
                (*id).to_owned(),
                json!({ "pl3xmap": format!("https://{id}.example.com/") }),
            )
        })
        .collect();
    json!({ "servers": servers })
}

// ---------------------------------------------------------------------------
// Health reporting
// ---------------------------------------------------------------------------

/// Structured health events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started for the named application.
    BootstrapStarting(String),
    /// A stage started.
    StageStarting(BootstrapStage),
    /// The current server was chosen.
    ServerResolved {
        /// Selected server.
        server: String,
        /// Whether the address was rewritten.
        rewrite: bool,
    },
    /// The UI was mounted.
    BootstrapMounted(String),
    /// A stage failed.
    StageFailed {
        /// Failing stage.
        stage: BootstrapStage,
        /// Failure classification.
        kind: FailureKind,
    },
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self, app_name: &str) {
        self.record(HealthEvent::BootstrapStarting(app_name.to_owned()));
    }

    fn stage_starting(&self, stage: BootstrapStage) {
        self.record(HealthEvent::StageStarting(stage));
    }

    fn server_resolved(&self, resolution: &Resolution) {
        self.record(HealthEvent::ServerResolved {
            server: resolution.server_id().to_owned(),
            rewrite: resolution.url_rewrite_required(),
        });
    }

    fn bootstrap_mounted(&self, server_id: &str) {
        self.record(HealthEvent::BootstrapMounted(server_id.to_owned()));
    }

    fn stage_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::StageFailed {
            stage: error.stage(),
            kind: error.kind(),
        });
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// In-memory storage that records every write.
#[derive(Debug, Default)]
pub struct RecordingStorage {
    writes: Mutex<Vec<(String, String)>>,
}

impl RecordingStorage {
    /// Captures a copy of the recorded writes as `(key, value)` pairs.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().expect("storage mutex poisoned").clone()
    }
}

impl DurableStorage for RecordingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .writes
            .lock()
            .expect("storage mutex poisoned")
            .iter()
            .rev()
            .find(|(written, _)| written == key)
            .map(|(_, value)| value.clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes
            .lock()
            .expect("storage mutex poisoned")
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State containers
// ---------------------------------------------------------------------------

/// State container whose initialisation always rejects with `error`.
#[derive(Debug)]
pub struct RejectingStore {
    error: Option<StageError>,
    state: AppState,
}

impl RejectingStore {
    /// Rejects with an unclassified failure.
    #[must_use]
    pub fn generic(message: &str) -> Self {
        Self::with_error(StageError::generic(message))
    }

    /// Rejects with `error`.
    #[must_use]
    pub fn with_error(error: StageError) -> Self {
        Self {
            error: Some(error),
            state: AppState::default(),
        }
    }
}

impl StateContainer for RejectingStore {
    async fn initialise(
        &mut self,
        _parameters: &StartupParameters,
        _servers: ServerCollection,
    ) -> Result<(), StageError> {
        Err(self
            .error
            .take()
            .unwrap_or_else(|| StageError::generic("already rejected")))
    }

    fn state(&self) -> &AppState {
        &self.state
    }

    fn commit(&mut self, _mutation: Mutation) {}

    fn subscribe(&mut self, _subscriber: Box<dyn MutationSubscriber>) {}
}
