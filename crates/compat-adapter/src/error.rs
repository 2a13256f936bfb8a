//! Error types for adapter isolation

use crate::state::AdapterState;
use compat_model::{BoxError, ModelError};

/// Errors raised while declaring, compiling or publishing adapter scopes
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Namespace registered twice
    #[error("namespace '{namespace}' is already registered")]
    DuplicateNamespace {
        /// Offending namespace
        namespace: String,
    },

    /// Namespace registered without versions
    #[error("no versions specified for namespace '{namespace}'")]
    EmptyNamespaceVersions {
        /// Offending namespace
        namespace: String,
    },

    /// Namespace name outside `[A-Za-z0-9._-]`
    #[error("invalid namespace name '{namespace}': use only [A-Za-z0-9._-]")]
    InvalidNamespaceName {
        /// Offending namespace
        namespace: String,
    },

    /// Same version listed twice within one namespace
    #[error("version '{version}' is listed twice in namespace '{namespace}'")]
    DuplicateVersion {
        /// Offending namespace
        namespace: String,
        /// Repeated version
        version: String,
    },

    /// Version that yields no identifier segment (empty or only separators)
    #[error("invalid version '{version}' in namespace '{namespace}': versions need at least one letter or digit")]
    InvalidVersion {
        /// Offending namespace
        namespace: String,
        /// Rejected version
        version: String,
    },

    /// Two adapters sanitize to the same scope name
    #[error("adapters {first} and {second} both map to scope '{scope}'")]
    IdentifierCollision {
        /// Colliding scope name
        scope: String,
        /// First adapter, as `namespace@version`
        first: String,
        /// Second adapter, as `namespace@version`
        second: String,
    },

    /// No scope declared for the requested adapter
    #[error("no adapter scope declared for {namespace}@{version}")]
    UnknownAdapter {
        /// Requested namespace
        namespace: String,
        /// Requested version
        version: String,
    },

    /// Lifecycle transition not allowed from the current state
    #[error("adapter {adapter} cannot move from {from} to {to}")]
    IllegalTransition {
        /// Adapter, as `namespace@version`
        adapter: String,
        /// Current state
        from: AdapterState,
        /// Requested state
        to: AdapterState,
    },

    /// The compiler rejected one adapter scope
    #[error("failed to compile adapter {namespace}@{version} (scope '{scope}'): {source}")]
    Compile {
        /// Namespace
        namespace: String,
        /// Version
        version: String,
        /// Production scope name
        scope: String,
        /// Compiler error
        #[source]
        source: BoxError,
    },

    /// A compile-only pin shows up in a consumer runtime graph
    #[error("compile-only pin {pin} of adapter {namespace}@{version} leaks into the runtime requirements of '{consumer}'")]
    RuntimeLeak {
        /// Consumer artifact
        consumer: String,
        /// Leaking pin in notation form
        pin: String,
        /// Namespace
        namespace: String,
        /// Version
        version: String,
    },

    /// Invalid coordinate or conflicting pin while declaring a scope
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl AdapterError {
    /// Whether this is a per-adapter compile failure that leaves siblings untouched
    #[inline]
    #[must_use]
    pub fn is_compile_failure(&self) -> bool {
        matches!(self, Self::Compile { .. })
    }

    /// Namespace this error is about, if any
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::DuplicateNamespace { namespace }
            | Self::EmptyNamespaceVersions { namespace }
            | Self::InvalidNamespaceName { namespace }
            | Self::DuplicateVersion { namespace, .. }
            | Self::InvalidVersion { namespace, .. }
            | Self::UnknownAdapter { namespace, .. }
            | Self::Compile { namespace, .. }
            | Self::RuntimeLeak { namespace, .. } => Some(namespace),
            Self::IdentifierCollision { .. }
            | Self::IllegalTransition { .. }
            | Self::Model(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_names_the_adapter() {
        let err = AdapterError::Compile {
            namespace: "Lang".to_string(),
            version: "3.10".to_string(),
            scope: "compatLang3_10".to_string(),
            source: "symbol not found".into(),
        };
        assert!(err.is_compile_failure());
        assert_eq!(err.namespace(), Some("Lang"));
        assert_eq!(
            err.to_string(),
            "failed to compile adapter Lang@3.10 (scope 'compatLang3_10'): symbol not found"
        );
    }

    #[test]
    fn illegal_transition_renders_states() {
        let err = AdapterError::IllegalTransition {
            adapter: "Lang@3.0".to_string(),
            from: AdapterState::Declared,
            to: AdapterState::Published,
        };
        assert_eq!(
            err.to_string(),
            "adapter Lang@3.0 cannot move from declared to published"
        );
        assert!(!err.is_compile_failure());
    }
}
