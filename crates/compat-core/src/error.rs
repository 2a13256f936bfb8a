//! Error types for Compat Core
//!
//! Aggregates the per-layer errors:
//! - Model failures (coordinates, conflicting pins)
//! - Matrix generation failures
//! - Adapter declaration and compile failures
//! - Manifest loading failures
//! - Host registration failures

use compat_adapter::AdapterError;
use compat_matrix::MatrixError;
use compat_model::{BoxError, ModelError};
use std::path::PathBuf;

/// Main error type
#[derive(Debug, thiserror::Error)]
pub enum CompatError {
    /// Invalid coordinate or conflicting pin
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Matrix declaration or generation failed
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Adapter declaration, compile or publish failed
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// Manifest could not be loaded
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// The host refused a registration
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl CompatError {
    /// Whether the error comes from the declaration and aborts the whole pass
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Self::Model(_) | Self::Matrix(_) | Self::Manifest(_) => true,
            Self::Adapter(err) => !err.is_compile_failure(),
            Self::Host(_) => false,
        }
    }

    /// Whether the current pass cannot continue
    ///
    /// A single adapter compile failure is reported but leaves sibling
    /// adapters and the test matrix intact.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Adapter(err) if err.is_compile_failure())
    }
}

/// Manifest and configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// File could not be read
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML is malformed or has unexpected fields
    #[error("invalid manifest: {0}")]
    Parse(#[from] toml::de::Error),

    /// A coordinate entry does not parse
    #[error("invalid coordinate in {entry}: {source}")]
    Coordinate {
        /// Dimension or namespace declaring the coordinate
        entry: String,
        /// Parse error
        #[source]
        source: ModelError,
    },
}

/// Host registration errors
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host rejected one registration
    #[error("host rejected '{name}': {reason}")]
    Rejected {
        /// Unit or scope name
        name: String,
        /// Host-provided reason
        reason: String,
    },

    /// The host backend failed
    #[error("host backend failed: {0}")]
    Backend(#[source] BoxError),
}
