//! Error types for the model layer

use crate::scope::Visibility;

/// Errors raised while building coordinates, constraints and scopes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Coordinate notation is not `group:artifact`
    #[error("invalid coordinate '{0}': expected 'group:artifact'")]
    InvalidCoordinate(String),

    /// Constraint notation is not `group:artifact:version[!!]`
    #[error("invalid constraint '{0}': expected 'group:artifact:version' with optional '!!'")]
    InvalidConstraint(String),

    /// Two strict pins on the same coordinate disagree within one scope
    #[error(
        "conflicting strict pins for {coordinate} in scope '{scope}': {existing} vs {requested}"
    )]
    ConflictingConstraint {
        /// Scope receiving the constraint
        scope: String,
        /// Pinned coordinate
        coordinate: String,
        /// Version already pinned
        existing: String,
        /// Version requested
        requested: String,
    },

    /// The same pin was added with two different visibilities
    #[error("{coordinate} is already {existing:?} in scope '{scope}', cannot add it as {requested:?}")]
    VisibilityMismatch {
        /// Scope receiving the constraint
        scope: String,
        /// Pinned coordinate
        coordinate: String,
        /// Visibility already recorded
        existing: Visibility,
        /// Visibility requested
        requested: Visibility,
    },
}
