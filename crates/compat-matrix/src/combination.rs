//! Version tuples
//!
//! A [`Combination`] is one concrete selection of a version from every
//! dimension. It is a typed record: versions can be read positionally or by
//! dimension name, so callers never depend on index arithmetic when the
//! dimension order changes.

use crate::error::MatrixError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::sync::Arc;

/// One version per registered dimension, index-aligned to registration order
///
/// Dimension names are shared read-only between the combinations of one
/// pass; versions are owned per combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    dimensions: Arc<[String]>,
    versions: Vec<String>,
}

impl Combination {
    pub(crate) fn new(dimensions: Arc<[String]>, versions: Vec<String>) -> Self {
        debug_assert_eq!(dimensions.len(), versions.len());
        Self {
            dimensions,
            versions,
        }
    }

    /// Number of dimensions in the tuple
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Whether the tuple has no dimensions
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Version at a position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.versions.get(index).map(String::as_str)
    }

    /// Version of a named dimension
    ///
    /// # Errors
    /// Returns [`MatrixError::UnknownDimension`] if `dimension` is not part
    /// of this matrix.
    pub fn version(&self, dimension: &str) -> Result<&str, MatrixError> {
        self.dimensions
            .iter()
            .position(|name| name == dimension)
            .map(|index| self.versions[index].as_str())
            .ok_or_else(|| MatrixError::UnknownDimension {
                dimension: dimension.to_string(),
                known: self.dimensions.to_vec(),
            })
    }

    /// Versions in dimension order
    #[inline]
    #[must_use]
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Dimension names in order
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// `(dimension, version)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.dimensions
            .iter()
            .zip(&self.versions)
            .map(|(d, v)| (d.as_str(), v.as_str()))
    }

    /// Destructure into exactly `N` versions
    ///
    /// ```rust
    /// # use compat_matrix::DimensionRegistry;
    /// # use compat_matrix::CombinationGenerator;
    /// # let mut registry = DimensionRegistry::new();
    /// # registry.register("CommonsLang", ["3.0"]).unwrap();
    /// # registry.register("Java", ["17"]).unwrap();
    /// # let combinations = CombinationGenerator::new(&registry).enumerate().unwrap();
    /// let [lang, java] = combinations[0].destructure::<2>().unwrap();
    /// assert_eq!((lang, java), ("3.0", "17"));
    /// ```
    ///
    /// # Errors
    /// Returns [`MatrixError::FilterArity`] if the tuple has another length.
    pub fn destructure<const N: usize>(&self) -> Result<[&str; N], MatrixError> {
        if self.versions.len() != N {
            return Err(MatrixError::FilterArity {
                expected: N,
                actual: self.versions.len(),
                dimensions: self.dimensions.to_vec(),
            });
        }
        Ok(std::array::from_fn(|i| self.versions[i].as_str()))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, (dimension, version)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dimension}={version}")?;
        }
        f.write_str(")")
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (dimension, version) in self.iter() {
            map.serialize_entry(dimension, version)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combination(pairs: &[(&str, &str)]) -> Combination {
        let dimensions: Arc<[String]> = pairs.iter().map(|(d, _)| (*d).to_string()).collect();
        let versions = pairs.iter().map(|(_, v)| (*v).to_string()).collect();
        Combination::new(dimensions, versions)
    }

    #[test]
    fn positional_and_named_access_agree() {
        let c = combination(&[("CommonsLang", "3.5"), ("Java", "11")]);
        assert_eq!(c.get(0), Some("3.5"));
        assert_eq!(c.get(1), Some("11"));
        assert_eq!(c.get(2), None);
        assert_eq!(c.version("Java").unwrap(), "11");
        assert_eq!(c.version("CommonsLang").unwrap(), "3.5");
    }

    #[test]
    fn unknown_dimension_is_an_error() {
        let c = combination(&[("Java", "11")]);
        let err = c.version("Scala").unwrap_err();
        assert!(matches!(err, MatrixError::UnknownDimension { ref dimension, .. } if dimension == "Scala"));
    }

    #[test]
    fn destructure_checks_arity() {
        let c = combination(&[("a", "1"), ("b", "2")]);
        assert_eq!(c.destructure::<2>().unwrap(), ["1", "2"]);
        assert!(matches!(
            c.destructure::<1>(),
            Err(MatrixError::FilterArity { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn display_renders_tuple() {
        let c = combination(&[("CommonsLang", "3.0"), ("Java", "17")]);
        assert_eq!(c.to_string(), "(CommonsLang=3.0, Java=17)");
    }

    #[test]
    fn equality_is_positional() {
        let a = combination(&[("a", "1"), ("b", "2")]);
        let b = combination(&[("a", "1"), ("b", "2")]);
        let c = combination(&[("a", "2"), ("b", "1")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let c = combination(&[("Java", "17"), ("CommonsLang", "3.0")]);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"Java":"17","CommonsLang":"3.0"}"#);
    }
}
