//! Configuration-class errors raised while interpreting server definitions.
//!
//! Everything in [`ConfigurationError`] points at the deployment's
//! configuration rather than at the viewer: a missing server block, a map type
//! nobody registered a provider for, or provider settings the provider cannot
//! use. The bootstrap layer reports these with an actionable prefix instead of
//! a generic failure.

use atlas_config::ParametersError;
use thiserror::Error;

/// Errors caused by invalid or inconsistent configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    /// The startup parameters were absent or malformed.
    ///
    /// Only shape problems belong here; a document that could not be read at
    /// all is not a configuration mistake.
    #[error(transparent)]
    Parameters(ParametersError),

    /// No server is configured.
    #[error("no servers configured.\nCheck your server configuration is correct.")]
    NoServers,

    /// A server entry has no usable configuration block.
    #[error(
        "Server '{server}': Configuration missing.\nCheck your server configuration is correct."
    )]
    MissingServerConfig {
        /// Server id as written in the configuration.
        server: String,
    },

    /// A server entry names none of the registered map types.
    #[error(
        "Server '{server}': No configuration found for any supported map type.\n\
         Check your server configuration is correct."
    )]
    NoSupportedKind {
        /// Server id as written in the configuration.
        server: String,
    },

    /// No provider is registered under the requested kind.
    #[error("no map provider registered for kind '{kind}'")]
    UnknownProvider {
        /// Kind that was looked up.
        kind: String,
    },

    /// A provider rejected the settings of a server.
    #[error("Server '{server}': invalid {kind} configuration: {message}")]
    InvalidProviderSettings {
        /// Server id.
        server: String,
        /// Provider kind that rejected the settings.
        kind: String,
        /// Description of the problem.
        message: String,
    },
}

impl ConfigurationError {
    /// Builds an [`InvalidProviderSettings`](Self::InvalidProviderSettings)
    /// error.
    #[must_use]
    pub fn invalid_settings(
        server: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidProviderSettings {
            server: server.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}
