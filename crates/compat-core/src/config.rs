//! Workspace configuration
//!
//! ```toml
//! [matrix]
//! test_scope = "functionalTest"
//! fail_on_empty_matrix = true
//!
//! [adapters]
//! default_target_scope = "plugin"
//! ```

use crate::error::ManifestError;
use compat_adapter::AdapterConfig;
use compat_matrix::MatrixConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration of one compatibility context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Test matrix settings
    pub matrix: MatrixConfig,
    /// Adapter settings
    pub adapters: AdapterConfig,
}

impl CompatConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With matrix settings
    #[inline]
    #[must_use]
    pub fn with_matrix(mut self, matrix: MatrixConfig) -> Self {
        self.matrix = matrix;
        self
    }

    /// With adapter settings
    #[inline]
    #[must_use]
    pub fn with_adapters(mut self, adapters: AdapterConfig) -> Self {
        self.adapters = adapters;
        self
    }

    /// Parse from TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns [`ManifestError::Parse`] on malformed TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ManifestError::Io`] if the file cannot be read, or
    /// [`ManifestError::Parse`] on malformed TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
