//! Pluggable map-backend providers for the Atlas viewer.
//!
//! The viewer can show servers running different map backends side by side.
//! Each backend kind is implemented by a [`MapProvider`] and made available by
//! registering a [`ProviderFactory`] in the [`ProviderRegistry`] under one or
//! more kind identifiers. The rest of the viewer never names a concrete
//! backend: the server loader detects each server's kind from the registered
//! identifiers, and the state container builds providers through the registry.
//!
//! Registrations happen once at process start, before bootstrap. After that
//! the registry is only read.
//!
//! # Example
//!
//! ```
//! use atlas_providers::{ProviderRegistry, ServerDefinition, register_builtin_providers};
//! use serde_json::json;
//!
//! let mut registry = ProviderRegistry::new();
//! register_builtin_providers(&mut registry);
//!
//! let server = ServerDefinition::new("creative", "squaremap", json!("https://map.example.com"));
//! let provider = registry.create(&server).expect("squaremap is built in");
//! assert_eq!(provider.endpoints().get("base"), Some("https://map.example.com/"));
//! ```

pub mod builtin;
pub mod error;
pub mod provider;
pub mod registry;
pub mod server;

pub use self::builtin::register_builtin_providers;
pub use self::error::ConfigurationError;
pub use self::provider::{MapProvider, ProviderEndpoints, ProviderFactory};
pub use self::registry::ProviderRegistry;
pub use self::server::{LEGACY_DYNMAP_SERVER, ServerCollection, ServerDefinition, load_servers};
