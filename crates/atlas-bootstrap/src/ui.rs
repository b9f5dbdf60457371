//! UI root construction and mounting.
//!
//! The root wraps the initialised state container together with the fixed
//! plugin set and attaches to a named mount target supplied by a
//! [`MountHost`].

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::store::StateContainer;

/// Id of the element the viewer mounts on.
pub const MOUNT_TARGET_ID: &str = "app";

/// Plugins installed on every UI root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiPlugin {
    /// Toast notifications.
    Notifications,
    /// Clipboard access for copying locations.
    Clipboard,
}

impl UiPlugin {
    /// Plugin name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Clipboard => "clipboard",
        }
    }
}

impl fmt::Display for UiPlugin {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Fixed plugin set, in installation order.
pub const UI_PLUGINS: [UiPlugin; 2] = [UiPlugin::Notifications, UiPlugin::Clipboard];

/// Failure to attach the UI root.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    /// No mount target with the requested id exists.
    #[error("mount target '#{target}' was not found")]
    TargetNotFound {
        /// Requested target id.
        target: String,
    },
}

/// Element the UI root attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountTarget {
    id: String,
}

impl MountTarget {
    /// Target id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Document hosting mount targets.
pub trait MountHost {
    /// Looks up a target by id; `None` when it is absent.
    fn lookup(&self, id: &str) -> Option<MountTarget>;
}

/// Mount host without a rendering backend, used by the binary and tests.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    targets: BTreeSet<String>,
}

impl HeadlessHost {
    /// Host offering the standard [`MOUNT_TARGET_ID`] target.
    #[must_use]
    pub fn new() -> Self {
        Self::empty().with_target(MOUNT_TARGET_ID)
    }

    /// Host without any targets.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a target.
    #[must_use]
    pub fn with_target(mut self, id: impl Into<String>) -> Self {
        self.targets.insert(id.into());
        self
    }
}

impl MountHost for HeadlessHost {
    fn lookup(&self, id: &str) -> Option<MountTarget> {
        self.targets
            .contains(id)
            .then(|| MountTarget { id: id.to_owned() })
    }
}

/// Application root bound to a state container.
#[derive(Debug)]
pub struct UiRoot<S> {
    store: S,
    plugins: Vec<UiPlugin>,
}

impl<S> UiRoot<S>
where
    S: StateContainer,
{
    /// Builds the root with the fixed plugin set.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            plugins: UI_PLUGINS.to_vec(),
        }
    }

    /// Installed plugins.
    #[must_use]
    pub fn plugins(&self) -> &[UiPlugin] {
        &self.plugins
    }

    /// Attaches the root to the target named `target_id` on `host`.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::TargetNotFound`] when the host has no such
    /// target.
    pub fn mount<H>(self, host: &H, target_id: &str) -> Result<MountedUi<S>, MountError>
    where
        H: MountHost + ?Sized,
    {
        let target = host.lookup(target_id).ok_or_else(|| MountError::TargetNotFound {
            target: target_id.to_owned(),
        })?;
        tracing::debug!(
            target: "atlas_bootstrap::ui",
            mount_target = %target.id(),
            plugins = ?self.plugins,
            "mounting UI root"
        );
        Ok(MountedUi { root: self, target })
    }
}

/// UI root attached to its target.
#[derive(Debug)]
pub struct MountedUi<S> {
    root: UiRoot<S>,
    target: MountTarget,
}

impl<S> MountedUi<S> {
    /// State container driving the UI.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.root.store
    }

    /// Mutable access to the state container.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.root.store
    }

    /// Target the root is attached to.
    #[must_use]
    pub const fn target(&self) -> &MountTarget {
        &self.target
    }

    /// Installed plugins.
    #[must_use]
    pub fn plugins(&self) -> &[UiPlugin] {
        &self.root.plugins
    }
}
