//! Matrix configuration

use serde::{Deserialize, Serialize};

/// Settings for one compatibility test matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    /// Test scope the matrix runs against; prefixes every unit id
    pub test_scope: String,
    /// Fail generation when every combination is filtered out
    pub fail_on_empty_matrix: bool,
    /// Name of the aggregate unit depending on every runnable matrix unit
    pub lifecycle_unit: String,
    /// Host grouping label for generated units
    pub group: String,
}

impl MatrixConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With test scope
    #[inline]
    #[must_use]
    pub fn with_test_scope(mut self, test_scope: impl Into<String>) -> Self {
        self.test_scope = test_scope.into();
        self
    }

    /// With empty-matrix policy
    #[inline]
    #[must_use]
    pub fn with_fail_on_empty_matrix(mut self, fail: bool) -> Self {
        self.fail_on_empty_matrix = fail;
        self
    }

    /// With lifecycle unit name
    #[inline]
    #[must_use]
    pub fn with_lifecycle_unit(mut self, name: impl Into<String>) -> Self {
        self.lifecycle_unit = name.into();
        self
    }

    /// With group label
    #[inline]
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            test_scope: "test".to_string(),
            fail_on_empty_matrix: false,
            lifecycle_unit: "testCompatibility".to_string(),
            group: "verification".to_string(),
        }
    }
}
