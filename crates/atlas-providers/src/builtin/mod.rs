//! Providers shipped with the viewer.
//!
//! Three protocols are supported. `pl3xmap` and `squaremap` share one
//! implementation because squaremap serves the pl3xmap layout under another
//! name.

mod dynmap;
mod overviewer;
mod pl3xmap;

use serde_json::Value;

use crate::error::ConfigurationError;
use crate::provider::{MapProvider, ProviderFactory};
use crate::registry::ProviderRegistry;
use crate::server::ServerDefinition;

pub use dynmap::DynmapProvider;
pub use overviewer::OverviewerProvider;
pub use pl3xmap::Pl3xmapProvider;

/// Kind identifier of the dynmap provider.
pub const DYNMAP: &str = "dynmap";
/// Kind identifier of the pl3xmap provider.
pub const PL3XMAP: &str = "pl3xmap";
/// Alias of [`PL3XMAP`] used by squaremap servers.
pub const SQUAREMAP: &str = "squaremap";
/// Kind identifier of the Overviewer provider.
pub const OVERVIEWER: &str = "overviewer";

/// Registers every built-in provider kind.
pub fn register_builtin_providers(registry: &mut ProviderRegistry) {
    let pl3xmap = ProviderFactory::new(|server| boxed(Pl3xmapProvider::from_server(server)));

    registry.register(
        DYNMAP,
        ProviderFactory::new(|server| boxed(DynmapProvider::from_server(server))),
    );
    registry.register(PL3XMAP, pl3xmap.clone());
    registry.register(SQUAREMAP, pl3xmap);
    registry.register(
        OVERVIEWER,
        ProviderFactory::new(|server| boxed(OverviewerProvider::from_server(server))),
    );
}

fn boxed<P>(
    provider: Result<P, ConfigurationError>,
) -> Result<Box<dyn MapProvider>, ConfigurationError>
where
    P: MapProvider + 'static,
{
    provider.map(|provider| Box::new(provider) as Box<dyn MapProvider>)
}

/// Reads a settings block consisting of a single base URL, normalised to end
/// with `/`.
fn base_url(server: &ServerDefinition) -> Result<String, ConfigurationError> {
    match server.settings() {
        Value::String(url) if !url.trim().is_empty() => {
            let trimmed = url.trim();
            Ok(if trimmed.ends_with('/') {
                trimmed.to_owned()
            } else {
                format!("{trimmed}/")
            })
        }
        _ => Err(ConfigurationError::invalid_settings(
            server.id(),
            server.kind(),
            "expected a non-empty base URL string",
        )),
    }
}
