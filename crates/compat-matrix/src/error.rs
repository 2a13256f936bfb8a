//! Error types for matrix generation
//!
//! Every variant is a configuration-time failure: when one is raised the
//! whole generation pass is abandoned and nothing reaches the host.

use compat_model::BoxError;

/// Errors raised while registering dimensions or generating the matrix
#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    /// Dimension name registered twice
    #[error("dimension '{dimension}' is already registered")]
    DuplicateDimension {
        /// Offending dimension
        dimension: String,
    },

    /// Dimension registered without versions
    #[error("no versions specified for dimension '{dimension}'")]
    EmptyVersionList {
        /// Offending dimension
        dimension: String,
    },

    /// Dimension name outside `[A-Za-z0-9._-]`
    #[error("invalid dimension name '{dimension}': use only [A-Za-z0-9._-]")]
    InvalidDimensionName {
        /// Offending dimension
        dimension: String,
    },

    /// Same version listed twice within one dimension
    #[error("version '{version}' is listed twice in dimension '{dimension}'")]
    DuplicateVersion {
        /// Offending dimension
        dimension: String,
        /// Repeated version
        version: String,
    },

    /// Version that yields no identifier segment (empty or only separators)
    #[error("invalid version '{version}' in dimension '{dimension}': versions need at least one letter or digit")]
    InvalidVersion {
        /// Offending dimension
        dimension: String,
        /// Rejected version
        version: String,
    },

    /// Test scope that cannot prefix a host identifier
    #[error("invalid test scope '{test_scope}': use only [A-Za-z0-9_]")]
    InvalidTestScope {
        /// Rejected test scope
        test_scope: String,
    },

    /// Derived unit id contains characters a host may reject
    #[error("combination {combination} derives unsafe identifier '{id}'")]
    UnsafeIdentifier {
        /// Derived identifier
        id: String,
        /// Combination, rendered as a tuple
        combination: String,
    },

    /// Predicate, binding or callback referenced an unregistered dimension
    #[error("unknown dimension '{dimension}' (registered: {})", .known.join(", "))]
    UnknownDimension {
        /// Requested dimension
        dimension: String,
        /// Dimensions registered, in order
        known: Vec<String>,
    },

    /// Destructuring predicate expects a different number of dimensions
    #[error("predicate destructures {expected} versions but the matrix has {actual} dimensions ({})", .dimensions.join(", "))]
    FilterArity {
        /// Arity the predicate destructures
        expected: usize,
        /// Dimensions registered
        actual: usize,
        /// Dimension names, in order
        dimensions: Vec<String>,
    },

    /// Two distinct combinations sanitize to the same identifier
    #[error("combinations {first} and {second} both map to identifier '{id}'")]
    IdentifierCollision {
        /// Colliding identifier
        id: String,
        /// First combination, rendered as a tuple
        first: String,
        /// Second combination, rendered as a tuple
        second: String,
    },

    /// Every combination was filtered out while `fail_on_empty_matrix` is set
    #[error("all {enumerated} combinations of ({}) were filtered out", .dimensions.join(", "))]
    EmptyMatrix {
        /// Dimension names, in order
        dimensions: Vec<String>,
        /// Combinations enumerated before filtering
        enumerated: usize,
    },

    /// A user configuration callback failed
    #[error("configuration callback #{callback} failed for {combination} (unit '{unit}'): {source}")]
    Callback {
        /// Unit being configured
        unit: String,
        /// Combination, rendered as a tuple
        combination: String,
        /// Registration index of the failing callback
        callback: usize,
        /// The callback's error
        #[source]
        source: BoxError,
    },
}

impl MatrixError {
    /// Dimension names this error is about, for reporting
    #[must_use]
    pub fn dimensions(&self) -> Vec<&str> {
        match self {
            Self::DuplicateDimension { dimension }
            | Self::EmptyVersionList { dimension }
            | Self::InvalidDimensionName { dimension }
            | Self::DuplicateVersion { dimension, .. }
            | Self::InvalidVersion { dimension, .. }
            | Self::UnknownDimension { dimension, .. } => vec![dimension.as_str()],
            Self::FilterArity { dimensions, .. } | Self::EmptyMatrix { dimensions, .. } => {
                dimensions.iter().map(String::as_str).collect()
            }
            Self::InvalidTestScope { .. }
            | Self::UnsafeIdentifier { .. }
            | Self::IdentifierCollision { .. }
            | Self::Callback { .. } => Vec::new(),
        }
    }

    /// Whether the error was raised by user code rather than the declaration
    #[inline]
    #[must_use]
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, Self::Callback { .. })
    }
}
