//! Failure classification for the bootstrap sequence.
//!
//! Every failure is tagged as either [`FailureKind::Configuration`] or
//! [`FailureKind::Generic`] where it is detected. The tag travels by value with
//! the error, so the bootstrapper never has to guess the class from the error
//! type when it picks the message shown to the user.

use std::fmt;

use atlas_config::ParametersError;
use atlas_providers::ConfigurationError;
use thiserror::Error;

/// Classification of a bootstrap failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Bad, missing, or inconsistent configuration.
    Configuration,
    /// Anything else.
    Generic,
}

impl FailureKind {
    /// Prefix placed before the failure detail in the splash message.
    #[must_use]
    pub fn splash_prefix(self, app_name: &str) -> String {
        match self {
            Self::Configuration => format!("{app_name} configuration is invalid:\n"),
            Self::Generic => format!("{app_name} failed to load:\n"),
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Configuration => "configuration",
            Self::Generic => "generic",
        })
    }
}

/// Step of the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootstrapStage {
    /// Turning the startup parameters into a server collection.
    LoadConfig,
    /// Initialising the state container.
    InitialiseStore,
    /// Choosing the current server.
    ResolveServer,
    /// Committing the current server and mounting the UI.
    Mount,
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::LoadConfig => "load_config",
            Self::InitialiseStore => "initialise_store",
            Self::ResolveServer => "resolve_server",
            Self::Mount => "mount",
        })
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Failure reported by a bootstrap collaborator, already classified.
#[derive(Debug, Error)]
pub enum StageError {
    /// The collaborator rejected the configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Any other failure.
    #[error("{message}")]
    Generic {
        /// Human-readable failure description.
        message: String,
        /// Optional underlying error.
        #[source]
        source: Option<BoxedSource>,
    },
}

impl StageError {
    /// Builds an unclassified failure without an underlying source.
    #[must_use]
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an unclassified failure wrapping `source`.
    #[must_use]
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        Self::Generic {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Classification carried by the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Generic { .. } => FailureKind::Generic,
        }
    }
}

/// An unreadable parameters document is a generic failure; a missing or
/// malformed one is a configuration mistake.
impl From<ParametersError> for StageError {
    fn from(error: ParametersError) -> Self {
        match error {
            ParametersError::Read { .. } => Self::with_source(error.to_string(), error),
            ParametersError::Missing
            | ParametersError::Malformed { .. }
            | ParametersError::Syntax { .. } => {
                Self::Configuration(ConfigurationError::Parameters(error))
            }
        }
    }
}

/// Terminal failure of the bootstrap sequence.
#[derive(Debug, Error)]
#[error("bootstrap failed during {stage}: {source}")]
pub struct BootstrapError {
    stage: BootstrapStage,
    #[source]
    source: StageError,
}

impl BootstrapError {
    /// Tags a collaborator failure with the stage it happened in.
    #[must_use]
    pub const fn new(stage: BootstrapStage, source: StageError) -> Self {
        Self { stage, source }
    }

    /// Stage the failure happened in.
    #[must_use]
    pub const fn stage(&self) -> BootstrapStage {
        self.stage
    }

    /// Classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        self.source.kind()
    }

    /// The classified collaborator failure.
    #[must_use]
    pub const fn cause(&self) -> &StageError {
        &self.source
    }

    /// Failure detail shown to the user after the prefix.
    #[must_use]
    pub fn detail(&self) -> String {
        self.source.to_string()
    }

    /// Full user-facing message: classification prefix followed by detail.
    #[must_use]
    pub fn splash_message(&self, app_name: &str) -> String {
        format!("{}{}", self.kind().splash_prefix(app_name), self.detail())
    }
}
