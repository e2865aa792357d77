//! Built-in capabilities served by the daemon.

mod application;
mod asset_database;
mod prefab;

use crate::dispatch::{CapabilityRegistry, RegistryError};

pub use self::application::APPLICATION;
pub use self::asset_database::ASSET_DATABASE;
pub use self::prefab::PREFAB;

/// Builds the registry of built-in capabilities, optionally routing
/// unregistered namespaces to `fallback`.
///
/// # Errors
///
/// Returns [`RegistryError::UnknownFallback`] when `fallback` names no
/// built-in capability.
pub fn builtin_registry(fallback: Option<&str>) -> Result<CapabilityRegistry, RegistryError> {
    let mut registry = CapabilityRegistry::new();
    registry.register(application::capability())?;
    registry.register(asset_database::capability())?;
    registry.register(prefab::capability())?;
    match fallback {
        Some(name) => registry.with_fallback(name),
        None => Ok(registry),
    }
}
