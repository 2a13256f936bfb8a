//! Naming/identity resolution
//!
//! Unit ids are `<testScope>CompatibilityWith` followed by one
//! `<PascalDimension><version>` segment per dimension, joined by `And`:
//! `testCompatibilityWithCommonsLang3_10AndJava17`. The id depends only on
//! the combination's values, so it is stable across runs.

use crate::combination::Combination;
use crate::error::MatrixError;
use compat_model::ident::{is_host_safe, pascal_segment, version_segment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable identifier of an execution unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Id as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UnitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives ids and descriptions for combinations of one matrix
#[derive(Debug, Clone)]
pub struct NameResolver {
    test_scope: String,
}

impl NameResolver {
    /// Create resolver for units running against `test_scope`
    #[must_use]
    pub fn new(test_scope: impl Into<String>) -> Self {
        Self {
            test_scope: test_scope.into(),
        }
    }

    /// Derive the id of one combination
    #[must_use]
    pub fn derive_id(&self, combination: &Combination) -> UnitId {
        let segments: Vec<String> = combination
            .iter()
            .map(|(dimension, version)| {
                format!("{}{}", pascal_segment(dimension), version_segment(version))
            })
            .collect();
        UnitId(format!(
            "{}CompatibilityWith{}",
            self.test_scope,
            segments.join("And")
        ))
    }

    /// Default human-readable description of one combination
    #[must_use]
    pub fn describe(&self, combination: &Combination) -> String {
        let parts: Vec<String> = combination
            .iter()
            .map(|(dimension, version)| format!("{dimension} {version}"))
            .collect();
        format!(
            "Runs compatibility {} with {}.",
            self.test_scope,
            parts.join(" and ")
        )
    }

    /// Derive ids for every combination, rejecting collisions
    ///
    /// # Errors
    /// - [`MatrixError::UnsafeIdentifier`] if an id is not host-safe
    /// - [`MatrixError::IdentifierCollision`] naming both combinations when
    ///   two distinct combinations map to the same id
    pub fn resolve_all(&self, combinations: &[Combination]) -> Result<Vec<UnitId>, MatrixError> {
        let mut seen: HashMap<UnitId, usize> = HashMap::with_capacity(combinations.len());
        let mut ids = Vec::with_capacity(combinations.len());

        for (index, combination) in combinations.iter().enumerate() {
            let id = self.derive_id(combination);
            if !is_host_safe(id.as_str()) {
                return Err(MatrixError::UnsafeIdentifier {
                    id: id.to_string(),
                    combination: combination.to_string(),
                });
            }
            if let Some(&previous) = seen.get(&id) {
                return Err(MatrixError::IdentifierCollision {
                    id: id.to_string(),
                    first: combinations[previous].to_string(),
                    second: combination.to_string(),
                });
            }
            seen.insert(id.clone(), index);
            ids.push(id);
        }

        Ok(ids)
    }
}
