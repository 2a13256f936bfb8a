//! Resolution scopes
//!
//! A [`ResolutionScope`] is the owned description of one dependency
//! resolution context: its name, the scopes it extends and the constraints
//! added to it, each tagged with a [`Visibility`]. Scopes are plain values;
//! two scopes never share constraint storage, so a pin added to one can
//! never be observed through another.

use crate::coordinate::{Coordinate, DependencyConstraint};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of a resolution scope (or of the host configuration backing it)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeName(String);

impl ScopeName {
    /// Create scope name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a sibling name by appending a suffix (`fooRuntimeOnly`)
    #[must_use]
    pub fn suffixed(&self, suffix: &str) -> Self {
        Self(format!("{}{suffix}", self.0))
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ScopeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where a constraint is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible while compiling this scope only
    CompileOnly,
    /// Visible on this scope's runtime classpath only
    RuntimeOnly,
    /// Visible at compile time and runtime
    Implementation,
}

impl Visibility {
    /// Whether the constraint takes part in compilation
    #[inline]
    #[must_use]
    pub fn at_compile(self) -> bool {
        matches!(self, Self::CompileOnly | Self::Implementation)
    }

    /// Whether the constraint takes part in runtime resolution
    #[inline]
    #[must_use]
    pub fn at_runtime(self) -> bool {
        matches!(self, Self::RuntimeOnly | Self::Implementation)
    }
}

/// A constraint together with its visibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedConstraint {
    /// The pin
    pub constraint: DependencyConstraint,
    /// Where it applies
    pub visibility: Visibility,
}

/// One dependency resolution context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionScope {
    name: ScopeName,
    extends: Vec<ScopeName>,
    constraints: Vec<ScopedConstraint>,
    resolvable: bool,
}

impl ResolutionScope {
    /// Create an empty, resolvable scope
    #[must_use]
    pub fn new(name: ScopeName) -> Self {
        Self {
            name,
            extends: Vec::new(),
            constraints: Vec::new(),
            resolvable: true,
        }
    }

    /// Mark whether the host may resolve this scope directly
    ///
    /// Constraint buckets (`…RuntimeOnly`) are declared non-resolvable and
    /// are only consumed through a resolvable scope extending them.
    #[inline]
    #[must_use]
    pub fn with_resolvable(mut self, resolvable: bool) -> Self {
        self.resolvable = resolvable;
        self
    }

    /// Add a parent scope
    #[must_use]
    pub fn extending(mut self, parent: ScopeName) -> Self {
        if !self.extends.contains(&parent) {
            self.extends.push(parent);
        }
        self
    }

    /// Add a constraint, consuming and returning the scope
    ///
    /// # Errors
    /// See [`ResolutionScope::add_constraint`].
    pub fn with_constraint(
        mut self,
        constraint: DependencyConstraint,
        visibility: Visibility,
    ) -> Result<Self, ModelError> {
        self.add_constraint(constraint, visibility)?;
        Ok(self)
    }

    /// Add a constraint to this scope
    ///
    /// Adding an identical pin twice is a no-op. A strict and a preferred pin
    /// on the same coordinate and version collapse into the strict one.
    ///
    /// # Errors
    /// - [`ModelError::ConflictingConstraint`] if a strict pin on the same
    ///   coordinate with another version is already present, or the new pin
    ///   is strict and disagrees with an existing one
    /// - [`ModelError::VisibilityMismatch`] if the same pin was added with
    ///   another visibility
    pub fn add_constraint(
        &mut self,
        constraint: DependencyConstraint,
        visibility: Visibility,
    ) -> Result<(), ModelError> {
        let mut same_version = None;
        for (index, existing) in self.constraints.iter().enumerate() {
            if existing.constraint.coordinate() != constraint.coordinate() {
                continue;
            }
            if existing.constraint.version() == constraint.version() {
                if existing.visibility != visibility {
                    return Err(ModelError::VisibilityMismatch {
                        scope: self.name.to_string(),
                        coordinate: constraint.coordinate().to_string(),
                        existing: existing.visibility,
                        requested: visibility,
                    });
                }
                same_version = Some(index);
            } else if existing.constraint.is_strict() || constraint.is_strict() {
                return Err(ModelError::ConflictingConstraint {
                    scope: self.name.to_string(),
                    coordinate: constraint.coordinate().to_string(),
                    existing: existing.constraint.version().to_string(),
                    requested: constraint.version().to_string(),
                });
            }
        }

        match same_version {
            Some(index) => {
                if constraint.is_strict() {
                    self.constraints[index].constraint = constraint;
                }
            }
            None => self.constraints.push(ScopedConstraint {
                constraint,
                visibility,
            }),
        }
        Ok(())
    }

    /// Scope name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Scopes this one extends, in declaration order
    #[inline]
    #[must_use]
    pub fn extends(&self) -> &[ScopeName] {
        &self.extends
    }

    /// Whether the host may resolve this scope directly
    #[inline]
    #[must_use]
    pub fn is_resolvable(&self) -> bool {
        self.resolvable
    }

    /// All constraints with their visibility
    #[inline]
    #[must_use]
    pub fn constraints(&self) -> &[ScopedConstraint] {
        &self.constraints
    }

    /// Constraints that apply while compiling this scope
    pub fn compile_view(&self) -> impl Iterator<Item = &DependencyConstraint> + '_ {
        self.constraints
            .iter()
            .filter(|c| c.visibility.at_compile())
            .map(|c| &c.constraint)
    }

    /// Constraints that apply on this scope's runtime classpath
    pub fn runtime_view(&self) -> impl Iterator<Item = &DependencyConstraint> + '_ {
        self.constraints
            .iter()
            .filter(|c| c.visibility.at_runtime())
            .map(|c| &c.constraint)
    }

    /// Whether any constraint in this scope targets `coordinate`
    #[must_use]
    pub fn pins(&self, coordinate: &Coordinate) -> bool {
        self.constraints
            .iter()
            .any(|c| c.constraint.coordinate() == coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pin(notation: &str) -> DependencyConstraint {
        notation.parse().unwrap()
    }

    #[test]
    fn scope_name_suffix() {
        let name = ScopeName::new("testCompatibilityWithDim1_0");
        assert_eq!(
            name.suffixed("RuntimeOnly").as_str(),
            "testCompatibilityWithDim1_0RuntimeOnly"
        );
    }

    #[test]
    fn compile_only_pin_absent_from_runtime_view() {
        let scope = ResolutionScope::new(ScopeName::new("compatLang3_0"))
            .with_constraint(pin("a:b:3.0!!"), Visibility::CompileOnly)
            .unwrap();
        assert_eq!(scope.compile_view().count(), 1);
        assert_eq!(scope.runtime_view().count(), 0);
    }

    #[test]
    fn runtime_only_pin_absent_from_compile_view() {
        let scope = ResolutionScope::new(ScopeName::new("testCompatLang3_0"))
            .with_constraint(pin("a:b:3.0!!"), Visibility::RuntimeOnly)
            .unwrap();
        assert_eq!(scope.compile_view().count(), 0);
        assert_eq!(scope.runtime_view().count(), 1);
    }

    #[test]
    fn duplicate_pin_is_idempotent() {
        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::RuntimeOnly).unwrap();
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::RuntimeOnly).unwrap();
        assert_eq!(scope.constraints().len(), 1);
    }

    #[test]
    fn strict_pin_absorbs_preferred_pin_of_same_version() {
        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0"), Visibility::RuntimeOnly).unwrap();
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::RuntimeOnly).unwrap();
        assert_eq!(scope.constraints().len(), 1);
        assert!(scope.constraints()[0].constraint.is_strict());

        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::RuntimeOnly).unwrap();
        scope.add_constraint(pin("a:b:1.0"), Visibility::RuntimeOnly).unwrap();
        assert_eq!(scope.constraints().len(), 1);
        assert!(scope.constraints()[0].constraint.is_strict());
    }

    #[test]
    fn conflicting_strict_pins_rejected() {
        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::RuntimeOnly).unwrap();
        let err = scope
            .add_constraint(pin("a:b:2.0"), Visibility::RuntimeOnly)
            .unwrap_err();
        assert!(matches!(err, ModelError::ConflictingConstraint { .. }));
    }

    #[test]
    fn preferred_versions_may_coexist() {
        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0"), Visibility::Implementation).unwrap();
        scope.add_constraint(pin("a:b:2.0"), Visibility::Implementation).unwrap();
        assert_eq!(scope.constraints().len(), 2);
    }

    #[test]
    fn visibility_mismatch_rejected() {
        let mut scope = ResolutionScope::new(ScopeName::new("s"));
        scope.add_constraint(pin("a:b:1.0!!"), Visibility::CompileOnly).unwrap();
        let err = scope
            .add_constraint(pin("a:b:1.0!!"), Visibility::Implementation)
            .unwrap_err();
        assert!(matches!(err, ModelError::VisibilityMismatch { .. }));
    }

    #[test]
    fn extending_deduplicates_parents() {
        let scope = ResolutionScope::new(ScopeName::new("child"))
            .extending(ScopeName::new("parent"))
            .extending(ScopeName::new("parent"));
        assert_eq!(scope.extends().len(), 1);
    }

    #[test]
    fn pins_reports_coordinate() {
        let scope = ResolutionScope::new(ScopeName::new("s"))
            .with_constraint(pin("a:b:1.0!!"), Visibility::CompileOnly)
            .unwrap();
        assert!(scope.pins(&"a:b".parse().unwrap()));
        assert!(!scope.pins(&"a:c".parse().unwrap()));
    }
}
