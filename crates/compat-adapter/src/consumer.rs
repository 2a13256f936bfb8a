//! Consumer manifest
//!
//! The artifact that bundles adapter outputs. It records what it bundles
//! and the runtime requirements it imposes on whoever depends on it.
//! Compile-only pins must never show up among those requirements.

use crate::error::AdapterError;
use crate::manager::AdapterIsolationManager;
use crate::scope::{AdapterKey, AdapterScope};
use compat_model::{DependencyConstraint, ScopeName};
use serde::Serialize;

/// One adapter output bundled into the consumer artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundledAdapter {
    /// Adapter identity
    pub key: AdapterKey,
    /// Production scope the output was compiled in
    pub scope: ScopeName,
    /// Compiled artifact handle
    pub artifact: String,
    /// Scope the output is exported to
    pub exported_to: ScopeName,
}

/// Artifact bundling adapter outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumerManifest {
    name: String,
    bundled: Vec<BundledAdapter>,
    runtime_requirements: Vec<DependencyConstraint>,
}

impl ConsumerManifest {
    /// Create empty manifest
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bundled: Vec::new(),
            runtime_requirements: Vec::new(),
        }
    }

    /// Artifact name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a runtime requirement of the consumer artifact
    pub fn require(&mut self, constraint: DependencyConstraint) {
        if !self.runtime_requirements.contains(&constraint) {
            self.runtime_requirements.push(constraint);
        }
    }

    /// Bundled adapters in publish order
    #[inline]
    #[must_use]
    pub fn bundled(&self) -> &[BundledAdapter] {
        &self.bundled
    }

    /// Runtime requirements consumers inherit
    #[inline]
    #[must_use]
    pub fn runtime_requirements(&self) -> &[DependencyConstraint] {
        &self.runtime_requirements
    }

    pub(crate) fn bundle(&mut self, scope: &AdapterScope) {
        for constraint in scope.production().runtime_view() {
            self.require(constraint.clone());
        }
        self.bundled.push(BundledAdapter {
            key: scope.key().clone(),
            scope: scope.production().name().clone(),
            artifact: scope
                .output()
                .map(|o| o.artifact.clone())
                .unwrap_or_default(),
            exported_to: scope.exported_to().clone(),
        });
    }

    /// Check that no adapter's compile-only pin reaches the runtime requirements
    ///
    /// # Errors
    /// Returns [`AdapterError::RuntimeLeak`] for the first requirement on a
    /// coordinate some adapter pins compile-only.
    pub fn verify_runtime_exclusion(&self, manager: &AdapterIsolationManager) -> Result<(), AdapterError> {
        for (key, pin) in manager.compile_only_pins() {
            if let Some(leak) = self
                .runtime_requirements
                .iter()
                .find(|r| r.coordinate() == pin.coordinate())
            {
                return Err(AdapterError::RuntimeLeak {
                    consumer: self.name.clone(),
                    pin: leak.notation(),
                    namespace: key.namespace.clone(),
                    version: key.version.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AdapterConfig;
    use crate::namespace::{Namespace, NamespaceRegistry};
    use compat_model::Coordinate;

    #[test]
    fn explicit_runtime_requirement_on_pinned_coordinate_is_a_leak() {
        let lang = Coordinate::new("org.apache.commons", "commons-lang3").unwrap();
        let mut registry = NamespaceRegistry::new();
        registry
            .register_namespace(Namespace::new("Lang", ["3.0"]).pinning(lang.clone()))
            .unwrap();
        let manager = AdapterIsolationManager::plan(&registry, AdapterConfig::default()).unwrap();

        let mut manifest = ConsumerManifest::new("example");
        manifest.require("com.google.guava:guava:33.0".parse().unwrap());
        manifest.verify_runtime_exclusion(&manager).unwrap();

        manifest.require(DependencyConstraint::prefer(lang, "3.12"));
        let err = manifest.verify_runtime_exclusion(&manager).unwrap_err();
        assert!(matches!(
            err,
            AdapterError::RuntimeLeak { ref pin, ref version, .. }
                if pin == "org.apache.commons:commons-lang3:3.12" && version == "3.0"
        ));
    }
}
