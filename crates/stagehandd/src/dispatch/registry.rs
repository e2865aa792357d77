//! Capability registry: namespace name to capability surface.

use std::collections::BTreeMap;

use thiserror::Error;

use super::errors::DispatchError;
use super::member::Capability;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two capabilities share a name.
    #[error("capability '{name}' is already registered")]
    Duplicate {
        /// Conflicting name.
        name: String,
    },
    /// The configured fallback names no registered capability.
    #[error("fallback capability '{name}' is not registered")]
    UnknownFallback {
        /// Configured fallback name.
        name: String,
    },
}

/// Registered capabilities, fixed once the daemon starts serving.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, Capability>,
    fallback: Option<String>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `capability` under its name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] when the name is taken.
    pub fn register(&mut self, capability: Capability) -> Result<(), RegistryError> {
        let name = capability.name().to_owned();
        if self.capabilities.contains_key(&name) {
            return Err(RegistryError::Duplicate { name });
        }
        self.capabilities.insert(name, capability);
        Ok(())
    }

    /// Uses the capability called `name` for unregistered namespaces.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownFallback`] when `name` is not
    /// registered.
    pub fn with_fallback(mut self, name: impl Into<String>) -> Result<Self, RegistryError> {
        let name = name.into();
        if !self.capabilities.contains_key(&name) {
            return Err(RegistryError::UnknownFallback { name });
        }
        self.fallback = Some(name);
        Ok(self)
    }

    /// Looks up a capability by exact name, then the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCapability`] when neither applies.
    pub fn resolve(&self, name: &str) -> Result<&Capability, DispatchError> {
        self.capabilities
            .get(name.trim())
            .or_else(|| {
                self.fallback
                    .as_deref()
                    .and_then(|fallback| self.capabilities.get(fallback))
            })
            .ok_or_else(|| DispatchError::unknown_capability(name))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.capabilities.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn registry() -> CapabilityRegistry {
        let mut registry = CapabilityRegistry::new();
        registry.register(Capability::new("Alpha")).expect("alpha");
        registry.register(Capability::new("Beta")).expect("beta");
        registry
    }

    #[rstest]
    #[case("Alpha")]
    #[case("Beta")]
    fn registered_names_resolve_stably(registry: CapabilityRegistry, #[case] name: &str) {
        let first = registry.resolve(name).expect("registered");
        let second = registry.resolve(name).expect("registered");
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.name(), name);
    }

    #[rstest]
    #[case("Gamma")]
    #[case("alpha")]
    #[case("")]
    fn unregistered_names_fail(registry: CapabilityRegistry, #[case] name: &str) {
        let error = registry.resolve(name).expect_err("unregistered");
        assert!(matches!(error, DispatchError::UnknownCapability { .. }));
    }

    #[rstest]
    fn fallback_serves_unregistered_names(registry: CapabilityRegistry) {
        let registry = registry.with_fallback("Beta").expect("fallback");
        assert_eq!(registry.resolve("Gamma").expect("fallback").name(), "Beta");
        assert_eq!(registry.resolve("Alpha").expect("exact").name(), "Alpha");
    }

    #[rstest]
    fn rejects_duplicates_and_unknown_fallbacks(mut registry: CapabilityRegistry) {
        assert_eq!(
            registry.register(Capability::new("Alpha")),
            Err(RegistryError::Duplicate {
                name: String::from("Alpha")
            })
        );
        assert!(matches!(
            registry.with_fallback("Gamma"),
            Err(RegistryError::UnknownFallback { .. })
        ));
    }
}
