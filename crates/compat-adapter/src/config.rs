//! Adapter configuration

use serde::{Deserialize, Serialize};

/// Settings shared by every adapter namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Name of the aggregate unit depending on every adapter test unit
    pub lifecycle_unit: String,
    /// Scope receiving adapter outputs when a namespace names none
    pub default_target_scope: String,
    /// Host grouping label for adapter test units
    pub group: String,
}

impl AdapterConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With lifecycle unit name
    #[inline]
    #[must_use]
    pub fn with_lifecycle_unit(mut self, name: impl Into<String>) -> Self {
        self.lifecycle_unit = name.into();
        self
    }

    /// With default target scope
    #[inline]
    #[must_use]
    pub fn with_default_target_scope(mut self, scope: impl Into<String>) -> Self {
        self.default_target_scope = scope.into();
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

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            lifecycle_unit: "testCompatibilityAdapters".to_string(),
            default_target_scope: "main".to_string(),
            group: "verification".to_string(),
        }
    }
}
