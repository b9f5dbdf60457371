//! Unit tests for the bootstrap sequence.

use std::io;
use std::sync::Arc;

use atlas_config::ParametersError;
use atlas_providers::ConfigurationError;
use camino::Utf8PathBuf;
use mockall::mock;
use mockall::predicate::{always, eq, function};
use rstest::rstest;
use serde_json::{Value, json};

use crate::bootstrap::Bootstrapper;
use crate::error::{BootstrapStage, FailureKind, StageError};
use crate::history::MemoryHistory;
use crate::loader::{ParametersConfigLoader, StaticConfigLoader};
use crate::persist::PersistedUiStateSync;
use crate::splash::{ErrorSurface, SplashScreen};
use crate::store::{MemoryStore, Mutation, StateContainer};
use crate::ui::{HeadlessHost, UiPlugin};

use super::support::{
    HealthEvent, RecordingHealthReporter, RecordingStorage, RejectingStore, builtin_registry,
    parameters_for,
};

mock! {
    Surface {}
    impl ErrorSurface for Surface {
        fn show_error(&self, message: &str, unrecoverable: bool);
    }
}

fn memory_store() -> MemoryStore {
    MemoryStore::new(builtin_registry())
}

fn loader() -> ParametersConfigLoader {
    ParametersConfigLoader::new(builtin_registry())
}

// ---------------------------------------------------------------------------
// Successful runs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mounts_the_server_named_by_the_address() {
    let history = MemoryHistory::new("/maps/b#world;flat");
    let host = HeadlessHost::new();
    let mut surface = MockSurface::new();
    surface.expect_show_error().never();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        memory_store(),
        &history,
        &host,
        &surface,
    )
    .with_reporter(reporter.clone())
    .run(parameters_for(&["a", "b", "c"]))
    .await;

    let mounted = outcome.into_result().expect("bootstrap mounts");
    assert_eq!(mounted.store().state().current_server(), Some("b"));
    assert_eq!(
        mounted.plugins(),
        [UiPlugin::Notifications, UiPlugin::Clipboard]
    );
    assert!(history.replacements().is_empty());
    assert_eq!(
        reporter.events(),
        [
            HealthEvent::BootstrapStarting(String::from("LiveAtlas")),
            HealthEvent::StageStarting(BootstrapStage::LoadConfig),
            HealthEvent::StageStarting(BootstrapStage::InitialiseStore),
            HealthEvent::StageStarting(BootstrapStage::ResolveServer),
            HealthEvent::ServerResolved {
                server: String::from("b"),
                rewrite: false,
            },
            HealthEvent::StageStarting(BootstrapStage::Mount),
            HealthEvent::BootstrapMounted(String::from("b")),
        ]
    );
}

#[tokio::test]
async fn unknown_server_falls_back_and_rewrites_the_address() {
    let history = MemoryHistory::new("/maps/z#world;flat");
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        memory_store(),
        &history,
        &host,
        &splash,
    )
    .run(parameters_for(&["a", "b", "c"]))
    .await;

    let mounted = outcome.into_result().expect("bootstrap mounts");
    assert_eq!(mounted.store().state().current_server(), Some("a"));
    assert_eq!(history.replacements(), ["/maps/z/a#world;flat"]);
    assert!(splash.shown().is_none());
}

#[tokio::test]
async fn sidebar_changes_after_mount_reach_storage() {
    let storage = Arc::new(RecordingStorage::default());
    let mut store = memory_store();
    PersistedUiStateSync::install(&mut store, storage.clone());
    let history = MemoryHistory::new("/");
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();

    let mut mounted = Bootstrapper::new("LiveAtlas", loader(), store, &history, &host, &splash)
        .run(parameters_for(&["only"]))
        .await
        .into_result()
        .expect("bootstrap mounts");
    assert!(storage.writes().is_empty(), "selecting a server is not persisted");

    mounted
        .store_mut()
        .commit(Mutation::ToggleSidebarSectionCollapsedState(String::from(
            "players",
        )));

    assert_eq!(
        storage.writes(),
        [(
            String::from("uiSettings"),
            String::from(r#"{"sidebar":{"players":true}}"#)
        )]
    );
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[rstest]
#[case::no_servers(json!({ "servers": {} }), "no servers configured")]
#[case::missing_parameters(Value::Null, "No configuration found.")]
#[case::unknown_kind(
    json!({ "servers": { "main": { "bluemap": "https://example.com/" } } }),
    "main"
)]
#[tokio::test]
async fn configuration_failures_use_the_configuration_prefix(
    #[case] parameters: Value,
    #[case] detail: &'static str,
) {
    let history = MemoryHistory::new("/");
    let host = HeadlessHost::new();
    let mut surface = MockSurface::new();
    surface
        .expect_show_error()
        .with(
            function(move |message: &str| {
                message.starts_with("LiveAtlas configuration is invalid:\n")
                    && message.contains(detail)
            }),
            eq(true),
        )
        .times(1)
        .return_const(());

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        memory_store(),
        &history,
        &host,
        &surface,
    )
    .run(parameters)
    .await;

    let error = outcome.error().expect("bootstrap fails");
    assert_eq!(error.kind(), FailureKind::Configuration);
    assert_eq!(error.stage(), BootstrapStage::LoadConfig);
}

#[rstest]
#[case::absent_file(
    ParametersError::Missing,
    FailureKind::Configuration,
    "LiveAtlas configuration is invalid:\nNo configuration found."
)]
#[case::unreadable_file(
    ParametersError::Read {
        path: Utf8PathBuf::from("atlas.json"),
        source: Arc::new(io::Error::new(io::ErrorKind::IsADirectory, "is a directory")),
    },
    FailureKind::Generic,
    "LiveAtlas failed to load:\nfailed to read startup parameters 'atlas.json'"
)]
#[tokio::test]
async fn unusable_parameter_documents_stop_at_load_config(
    #[case] document_error: ParametersError,
    #[case] kind: FailureKind,
    #[case] prefix: &'static str,
) {
    let history = MemoryHistory::new("/");
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        memory_store(),
        &history,
        &host,
        &splash,
    )
    .with_reporter(reporter.clone())
    .run_from_document(Err(document_error))
    .await;

    let error = outcome.error().expect("bootstrap fails");
    assert_eq!(error.kind(), kind);
    assert_eq!(error.stage(), BootstrapStage::LoadConfig);
    let shown = splash.shown().expect("splash shows the failure");
    assert!(
        shown.message.starts_with(prefix),
        "unexpected splash message: {}",
        shown.message
    );
    assert!(shown.unrecoverable);
    assert!(!reporter.events().contains(&HealthEvent::StageStarting(
        BootstrapStage::InitialiseStore
    )));
}

#[tokio::test]
async fn untagged_store_rejection_uses_the_generic_prefix() {
    let history = MemoryHistory::new("/maps/a");
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();
    let reporter = Arc::new(RecordingHealthReporter::default());

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        RejectingStore::generic("connection reset"),
        &history,
        &host,
        &splash,
    )
    .with_reporter(reporter.clone())
    .run(parameters_for(&["a", "b"]))
    .await;

    assert!(!outcome.is_mounted());
    let shown = splash.shown().expect("splash shows the failure");
    assert_eq!(shown.message, "LiveAtlas failed to load:\nconnection reset");
    assert!(shown.unrecoverable);
    assert!(reporter.events().contains(&HealthEvent::StageFailed {
        stage: BootstrapStage::InitialiseStore,
        kind: FailureKind::Generic,
    }));
    assert!(history.replacements().is_empty());
}

#[tokio::test]
async fn tagged_store_rejection_keeps_the_configuration_class() {
    let history = MemoryHistory::new("/");
    let host = HeadlessHost::new();
    let splash = SplashScreen::new();

    let outcome = Bootstrapper::new(
        "Atlas",
        loader(),
        RejectingStore::with_error(StageError::from(ConfigurationError::NoServers)),
        &history,
        &host,
        &splash,
    )
    .run(parameters_for(&["a"]))
    .await;

    assert_eq!(
        outcome.error().map(crate::BootstrapError::kind),
        Some(FailureKind::Configuration)
    );
    let shown = splash.shown().expect("splash shows the failure");
    assert!(shown.message.starts_with("Atlas configuration is invalid:\n"));
}

#[tokio::test]
async fn loader_failures_stop_before_the_store_is_touched() {
    let history = MemoryHistory::new("/");
    let host = HeadlessHost::new();
    let mut surface = MockSurface::new();
    surface
        .expect_show_error()
        .with(eq("LiveAtlas failed to load:\nfetch aborted"), always())
        .times(1)
        .return_const(());
    let reporter = Arc::new(RecordingHealthReporter::default());

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        StaticConfigLoader::new(Err(StageError::generic("fetch aborted"))),
        RejectingStore::generic("must not be reached"),
        &history,
        &host,
        &surface,
    )
    .with_reporter(reporter.clone())
    .run(Value::Null)
    .await;

    assert_eq!(
        outcome.error().map(crate::BootstrapError::stage),
        Some(BootstrapStage::LoadConfig)
    );
    assert!(
        !reporter
            .events()
            .contains(&HealthEvent::StageStarting(BootstrapStage::InitialiseStore))
    );
}

#[tokio::test]
async fn missing_mount_target_is_a_generic_mount_failure() {
    let history = MemoryHistory::new("/maps/b");
    let host = HeadlessHost::empty();
    let splash = SplashScreen::new();

    let outcome = Bootstrapper::new(
        "LiveAtlas",
        loader(),
        memory_store(),
        &history,
        &host,
        &splash,
    )
    .run(parameters_for(&["a", "b"]))
    .await;

    let error = outcome.error().expect("mount fails");
    assert_eq!(error.stage(), BootstrapStage::Mount);
    assert_eq!(error.kind(), FailureKind::Generic);
    let shown = splash.shown().expect("splash shows the failure");
    assert_eq!(
        shown.message,
        "LiveAtlas failed to load:\nmount target '#app' was not found"
    );
}
