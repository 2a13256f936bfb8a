//! Dimension registry
//!
//! Provides [`DimensionRegistry`], the ordered, write-once list of named
//! version axes. Registration order is significant: it becomes the
//! positional order of every [`Combination`](crate::Combination).

use crate::error::MatrixError;
use compat_model::ident;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One named axis of the matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    name: String,
    versions: Vec<String>,
}

impl Dimension {
    /// Dimension name
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

    /// Number of versions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false for a registered dimension
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Ordered registry of dimensions
///
/// There is no removal: a registry describes one configuration pass and is
/// rebuilt from scratch for the next one.
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    dimensions: IndexMap<String, Dimension>,
}

impl DimensionRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dimension
    ///
    /// # Errors
    /// - [`MatrixError::InvalidDimensionName`] for names outside `[A-Za-z0-9._-]`
    /// - [`MatrixError::DuplicateDimension`] if `name` is already registered
    /// - [`MatrixError::EmptyVersionList`] if `versions` is empty
    /// - [`MatrixError::InvalidVersion`] for an empty or separator-only version
    /// - [`MatrixError::DuplicateVersion`] if a version is listed twice
    pub fn register<I, V>(&mut self, name: impl Into<String>, versions: I) -> Result<(), MatrixError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let name = name.into();
        if !ident::is_valid_name(&name) {
            return Err(MatrixError::InvalidDimensionName { dimension: name });
        }
        if self.dimensions.contains_key(&name) {
            return Err(MatrixError::DuplicateDimension { dimension: name });
        }

        let versions: Vec<String> = versions.into_iter().map(Into::into).collect();
        if versions.is_empty() {
            return Err(MatrixError::EmptyVersionList { dimension: name });
        }
        let mut seen = HashSet::with_capacity(versions.len());
        for version in &versions {
            if !ident::is_valid_version(version) {
                return Err(MatrixError::InvalidVersion {
                    dimension: name,
                    version: version.clone(),
                });
            }
            if !seen.insert(version.as_str()) {
                return Err(MatrixError::DuplicateVersion {
                    dimension: name,
                    version: version.clone(),
                });
            }
        }

        tracing::debug!("Registered dimension {} with {} versions", name, versions.len());
        self.dimensions
            .insert(name.clone(), Dimension { name, versions });
        Ok(())
    }

    /// All dimensions in registration order
    pub fn all_dimensions(&self) -> impl ExactSizeIterator<Item = &Dimension> + '_ {
        self.dimensions.values()
    }

    /// Dimension names in registration order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.dimensions.keys().cloned().collect()
    }

    /// Lookup dimension by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    /// Position of a dimension in every combination tuple
    #[inline]
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.dimensions.get_index_of(name)
    }

    /// Check if dimension exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dimensions.contains_key(name)
    }

    /// Number of registered dimensions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Number of combinations before filtering
    ///
    /// An empty registry spans no combinations. Returns `None` on overflow.
    #[must_use]
    pub fn product_size(&self) -> Option<usize> {
        if self.dimensions.is_empty() {
            return Some(0);
        }
        self.dimensions
            .values()
            .try_fold(1usize, |acc, d| acc.checked_mul(d.len()))
    }

    /// Build the error for a name that is not registered
    #[must_use]
    pub fn unknown(&self, name: &str) -> MatrixError {
        MatrixError::UnknownDimension {
            dimension: name.to_string(),
            known: self.names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_new_empty() {
        let registry = DimensionRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.product_size(), Some(0));
    }

    #[test]
    fn registry_preserves_registration_order() {
        let mut registry = DimensionRegistry::new();
        registry.register("dim2B", ["1.0"]).unwrap();
        registry.register("dim2A", ["1.0"]).unwrap();
        let names: Vec<&str> = registry.all_dimensions().map(Dimension::name).collect();
        assert_eq!(names, vec!["dim2B", "dim2A"]);
        assert_eq!(registry.index_of("dim2A"), Some(1));
    }

    #[test]
    fn registry_rejects_duplicate() {
        let mut registry = DimensionRegistry::new();
        registry.register("Java", ["8"]).unwrap();
        let err = registry.register("Java", ["11"]).unwrap_err();
        assert!(matches!(err, MatrixError::DuplicateDimension { dimension } if dimension == "Java"));
        assert_eq!(registry.get("Java").unwrap().versions(), ["8".to_string()]);
    }

    #[test]
    fn registry_rejects_empty_versions() {
        let mut registry = DimensionRegistry::new();
        let err = registry.register("Java", Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, MatrixError::EmptyVersionList { dimension } if dimension == "Java"));
        assert!(!registry.contains("Java"));
    }

    #[test]
    fn registry_rejects_invalid_name() {
        let mut registry = DimensionRegistry::new();
        assert!(matches!(
            registry.register("bad name", ["1"]),
            Err(MatrixError::InvalidDimensionName { .. })
        ));
        assert!(matches!(
            registry.register("", ["1"]),
            Err(MatrixError::InvalidDimensionName { .. })
        ));
    }

    #[test]
    fn registry_rejects_repeated_version() {
        let mut registry = DimensionRegistry::new();
        let err = registry.register("Java", ["8", "11", "8"]).unwrap_err();
        assert!(matches!(err, MatrixError::DuplicateVersion { version, .. } if version == "8"));
    }

    #[test]
    fn registry_rejects_versions_without_a_segment() {
        let mut registry = DimensionRegistry::new();
        for bad in ["", ".", "-_"] {
            let err = registry.register("Java", ["8", bad]).unwrap_err();
            assert!(matches!(err, MatrixError::InvalidVersion { ref version, .. } if version == bad));
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn product_size_multiplies() {
        let mut registry = DimensionRegistry::new();
        registry.register("CommonsLang", ["3.0", "3.5", "3.10"]).unwrap();
        registry.register("Java", ["8", "11", "17"]).unwrap();
        registry.register("Os", ["linux", "mac"]).unwrap();
        assert_eq!(registry.product_size(), Some(18));
    }

    #[test]
    fn unknown_names_known_dimensions() {
        let mut registry = DimensionRegistry::new();
        registry.register("Java", ["8"]).unwrap();
        let err = registry.unknown("Scala");
        assert!(err.to_string().contains("Java"));
    }
}
