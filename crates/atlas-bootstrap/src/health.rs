//! Structured health reporting for bootstrap lifecycle events.

use std::sync::Arc;

use crate::error::{BootstrapError, BootstrapStage};
use crate::resolver::Resolution;

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before the first bootstrap stage runs.
    fn bootstrap_starting(&self, app_name: &str);

    /// Invoked before each stage.
    fn stage_starting(&self, stage: BootstrapStage);

    /// Invoked once the current server has been chosen.
    fn server_resolved(&self, resolution: &Resolution);

    /// Invoked after the UI has been mounted.
    fn bootstrap_mounted(&self, server_id: &str);

    /// Invoked when a stage fails. No further events follow.
    fn stage_failed(&self, error: &BootstrapError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self, app_name: &str) {
        (**self).bootstrap_starting(app_name);
    }

    fn stage_starting(&self, stage: BootstrapStage) {
        (**self).stage_starting(stage);
    }

    fn server_resolved(&self, resolution: &Resolution) {
        (**self).server_resolved(resolution);
    }

    fn bootstrap_mounted(&self, server_id: &str) {
        (**self).bootstrap_mounted(server_id);
    }

    fn stage_failed(&self, error: &BootstrapError) {
        (**self).stage_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self, app_name: &str) {
        tracing::info!(
            target: "atlas_bootstrap::health",
            event = "bootstrap_starting",
            app = %app_name,
            version = env!("CARGO_PKG_VERSION"),
            "starting viewer bootstrap"
        );
    }

    fn stage_starting(&self, stage: BootstrapStage) {
        tracing::debug!(
            target: "atlas_bootstrap::health",
            event = "stage_starting",
            stage = %stage,
            "running bootstrap stage"
        );
    }

    fn server_resolved(&self, resolution: &Resolution) {
        tracing::info!(
            target: "atlas_bootstrap::health",
            event = "server_resolved",
            server = %resolution.server_id(),
            rewrite = resolution.url_rewrite_required(),
            "current server resolved"
        );
    }

    fn bootstrap_mounted(&self, server_id: &str) {
        tracing::info!(
            target: "atlas_bootstrap::health",
            event = "bootstrap_mounted",
            server = %server_id,
            "viewer mounted"
        );
    }

    fn stage_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: "atlas_bootstrap::health",
            event = "stage_failed",
            stage = %error.stage(),
            kind = %error.kind(),
            error = %error,
            "viewer bootstrap failed"
        );
    }
}
