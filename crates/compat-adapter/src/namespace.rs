//! Namespace registry
//!
//! A namespace groups the adapters written against one third-party
//! dependency, one adapter per supported release. Namespaces are
//! independent of the test matrix dimensions.

use crate::error::AdapterError;
use compat_model::{ident, Coordinate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One adapter namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    name: String,
    versions: Vec<String>,
    coordinate: Option<Coordinate>,
    target_scope: Option<String>,
}

impl Namespace {
    /// Create namespace; validated on registration
    pub fn new<I, V>(name: impl Into<String>, versions: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            versions: versions.into_iter().map(Into::into).collect(),
            coordinate: None,
            target_scope: None,
        }
    }

    /// Pin `coordinate` to each adapter's version, compile-only
    #[must_use]
    pub fn pinning(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Export adapter outputs to `scope` instead of the default target
    #[must_use]
    pub fn exported_to(mut self, scope: impl Into<String>) -> Self {
        self.target_scope = Some(scope.into());
        self
    }

    /// Namespace name; may be empty
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Versions in declaration order
    #[inline]
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Coordinate pinned by every adapter of this namespace
    #[inline]
    #[must_use]
    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    /// Explicit target scope
    #[inline]
    #[must_use]
    pub fn target_scope(&self) -> Option<&str> {
        self.target_scope.as_deref()
    }

    fn validate(&self) -> Result<(), AdapterError> {
        if !self.name.is_empty() && !ident::is_valid_name(&self.name) {
            return Err(AdapterError::InvalidNamespaceName {
                namespace: self.name.clone(),
            });
        }
        if self.versions.is_empty() {
            return Err(AdapterError::EmptyNamespaceVersions {
                namespace: self.name.clone(),
            });
        }
        let mut seen = HashSet::with_capacity(self.versions.len());
        for version in &self.versions {
            if !ident::is_valid_version(version) {
                return Err(AdapterError::InvalidVersion {
                    namespace: self.name.clone(),
                    version: version.clone(),
                });
            }
            if !seen.insert(version.as_str()) {
                return Err(AdapterError::DuplicateVersion {
                    namespace: self.name.clone(),
                    version: version.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Namespaces in registration order
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    namespaces: IndexMap<String, Namespace>,
}

impl NamespaceRegistry {
    /// Create empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace with its ordered versions
    ///
    /// # Errors
    /// See [`NamespaceRegistry::register_namespace`].
    pub fn register<I, V>(&mut self, name: impl Into<String>, versions: I) -> Result<(), AdapterError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.register_namespace(Namespace::new(name, versions))
    }

    /// Register a fully described namespace
    ///
    /// # Errors
    /// - [`AdapterError::InvalidNamespaceName`] for names outside `[A-Za-z0-9._-]`
    /// - [`AdapterError::DuplicateNamespace`] if the name is taken
    /// - [`AdapterError::EmptyNamespaceVersions`] without versions
    /// - [`AdapterError::InvalidVersion`] for an empty or separator-only version
    /// - [`AdapterError::DuplicateVersion`] if a version repeats
    pub fn register_namespace(&mut self, namespace: Namespace) -> Result<(), AdapterError> {
        namespace.validate()?;
        if self.namespaces.contains_key(namespace.name()) {
            return Err(AdapterError::DuplicateNamespace {
                namespace: namespace.name,
            });
        }
        tracing::debug!(
            "Registered namespace '{}' with {} versions",
            namespace.name,
            namespace.versions.len()
        );
        self.namespaces.insert(namespace.name.clone(), namespace);
        Ok(())
    }

    /// Namespaces in registration order
    pub fn all_namespaces(&self) -> impl ExactSizeIterator<Item = &Namespace> + '_ {
        self.namespaces.values()
    }

    /// Look up a namespace
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.get(name)
    }

    /// Number of namespaces
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    /// Whether nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
