//! Viewer bootstrap orchestration.
//!
//! The sequence runs once per process:
//!
//! 1. load the configuration from the startup parameters,
//! 2. initialise the state container,
//! 3. resolve the current server from the address,
//! 4. commit the server and mount the UI root.
//!
//! The first failing stage ends the sequence. The failure is reported to the
//! health reporter and shown on the error surface with a prefix chosen from its
//! classification. Nothing is retried.

use std::sync::Arc;

use atlas_config::ParametersError;
use serde_json::Value;

use crate::error::{BootstrapError, BootstrapStage, StageError};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::history::{History, apply_resolution};
use crate::loader::ConfigLoader;
use crate::resolver::resolve;
use crate::splash::ErrorSurface;
use crate::store::{Mutation, StateContainer};
use crate::ui::{MOUNT_TARGET_ID, MountHost, MountedUi, UiRoot};

/// Final state of a bootstrap run.
#[derive(Debug)]
pub enum BootstrapOutcome<S> {
    /// The UI was mounted.
    Mounted(MountedUi<S>),
    /// A stage failed; the error has already been shown to the user.
    Failed(BootstrapError),
}

impl<S> BootstrapOutcome<S> {
    /// Returns `true` when the UI was mounted.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        matches!(self, Self::Mounted(_))
    }

    /// The failure, when bootstrap did not complete.
    #[must_use]
    pub const fn error(&self) -> Option<&BootstrapError> {
        match self {
            Self::Mounted(_) => None,
            Self::Failed(error) => Some(error),
        }
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the stage failure when bootstrap did not complete.
    pub fn into_result(self) -> Result<MountedUi<S>, BootstrapError> {
        match self {
            Self::Mounted(mounted) => Ok(mounted),
            Self::Failed(error) => Err(error),
        }
    }
}

/// Single-shot bootstrap sequence over its collaborators.
pub struct Bootstrapper<'a, L, S> {
    app_name: String,
    loader: L,
    store: S,
    history: &'a dyn History,
    host: &'a dyn MountHost,
    surface: &'a dyn ErrorSurface,
    reporter: Arc<dyn HealthReporter>,
}

impl<'a, L, S> Bootstrapper<'a, L, S>
where
    L: ConfigLoader,
    S: StateContainer,
{
    /// Creates a bootstrapper reporting through [`StructuredHealthReporter`].
    #[must_use]
    pub fn new(
        app_name: impl Into<String>,
        loader: L,
        store: S,
        history: &'a dyn History,
        host: &'a dyn MountHost,
        surface: &'a dyn ErrorSurface,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            loader,
            store,
            history,
            host,
            surface,
            reporter: Arc::new(StructuredHealthReporter::new()),
        }
    }

    /// Replaces the health reporter.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn HealthReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Runs the sequence against the raw startup parameters.
    ///
    /// On failure the error surface receives the prefixed message with
    /// `unrecoverable` set, and the UI is never mounted.
    pub async fn run(self, startup_parameters: Value) -> BootstrapOutcome<S> {
        self.run_stages(Ok(startup_parameters)).await
    }

    /// Runs the sequence against the result of reading the parameters
    /// document.
    ///
    /// A read failure fails the load stage: an unreadable document is
    /// reported as a generic failure, a missing or malformed one as a
    /// configuration failure.
    pub async fn run_from_document(
        self,
        document: Result<Value, ParametersError>,
    ) -> BootstrapOutcome<S> {
        self.run_stages(document.map_err(StageError::from)).await
    }

    async fn run_stages(
        self,
        startup_parameters: Result<Value, StageError>,
    ) -> BootstrapOutcome<S> {
        let Self {
            app_name,
            loader,
            store,
            history,
            host,
            surface,
            reporter,
        } = self;

        reporter.bootstrap_starting(&app_name);
        let stages = Stages {
            history,
            host,
            reporter: reporter.as_ref(),
        };
        match stages.run(&loader, store, startup_parameters).await {
            Ok(mounted) => {
                let server = mounted.store().state().current_server().unwrap_or_default();
                reporter.bootstrap_mounted(server);
                BootstrapOutcome::Mounted(mounted)
            }
            Err(error) => {
                reporter.stage_failed(&error);
                surface.show_error(&error.splash_message(&app_name), true);
                BootstrapOutcome::Failed(error)
            }
        }
    }
}

impl<L, S> std::fmt::Debug for Bootstrapper<'_, L, S> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Bootstrapper")
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

struct Stages<'a> {
    history: &'a dyn History,
    host: &'a dyn MountHost,
    reporter: &'a dyn HealthReporter,
}

impl Stages<'_> {
    async fn run<L, S>(
        &self,
        loader: &L,
        mut store: S,
        startup_parameters: Result<Value, StageError>,
    ) -> Result<MountedUi<S>, BootstrapError>
    where
        L: ConfigLoader,
        S: StateContainer,
    {
        self.reporter.stage_starting(BootstrapStage::LoadConfig);
        let load_failed =
            |error: StageError| BootstrapError::new(BootstrapStage::LoadConfig, error);
        let raw = startup_parameters.map_err(load_failed)?;
        let loaded = loader.load(raw).await.map_err(load_failed)?;

        self.reporter.stage_starting(BootstrapStage::InitialiseStore);
        store
            .initialise(&loaded.parameters, loaded.servers)
            .await
            .map_err(|error| BootstrapError::new(BootstrapStage::InitialiseStore, error))?;

        self.reporter.stage_starting(BootstrapStage::ResolveServer);
        let location = self.history.location();
        let resolution = resolve(store.state().servers(), location.path()).map_err(|error| {
            BootstrapError::new(BootstrapStage::ResolveServer, StageError::from(error))
        })?;
        self.reporter.server_resolved(&resolution);
        apply_resolution(self.history, &resolution);

        self.reporter.stage_starting(BootstrapStage::Mount);
        store.commit(Mutation::SetCurrentServer(resolution.server_id().to_owned()));
        UiRoot::new(store)
            .mount(self.host, MOUNT_TARGET_ID)
            .map_err(|error| {
                BootstrapError::new(
                    BootstrapStage::Mount,
                    StageError::with_source(error.to_string(), error),
                )
            })
    }
}
