//! Execution units
//!
//! An [`ExecutionUnit`] is the immutable descriptor of one runnable item:
//! everything the host needs to realize it, with no lookups by name. It is
//! built through a [`UnitConfigurator`], a fresh mutable builder handed to
//! the configuration callbacks of exactly one combination.

use crate::combination::Combination;
use crate::error::MatrixError;
use crate::naming::UnitId;
use compat_model::{
    DependencyConstraint, ModelError, ResolutionScope, ScopeName, Visibility,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Descriptor of one synthesized unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionUnit {
    id: UnitId,
    description: String,
    group: String,
    combination: Combination,
    enabled: bool,
    toolchain: Option<String>,
    overrides: BTreeMap<String, String>,
    system_properties: BTreeMap<String, String>,
    test_scope: ScopeName,
    runtime_only: ResolutionScope,
    classpath: ResolutionScope,
}

impl ExecutionUnit {
    /// Unit id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &UnitId {
        &self.id
    }

    /// Human-readable description
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Host grouping label
    #[inline]
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// The version tuple this unit tests
    #[inline]
    #[must_use]
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Whether the host should run this unit
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Toolchain override, if any
    #[inline]
    #[must_use]
    pub fn toolchain(&self) -> Option<&str> {
        self.toolchain.as_deref()
    }

    /// Opaque environment overrides
    #[inline]
    #[must_use]
    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// System properties passed to the running test process
    #[inline]
    #[must_use]
    pub fn system_properties(&self) -> &BTreeMap<String, String> {
        &self.system_properties
    }

    /// Constraints pinned in this unit's runtime scope
    pub fn constraints(&self) -> impl Iterator<Item = &DependencyConstraint> + '_ {
        self.runtime_only.runtime_view()
    }

    /// Test scope whose compiled tests the unit runs
    #[inline]
    #[must_use]
    pub fn test_scope(&self) -> &ScopeName {
        &self.test_scope
    }

    /// Non-resolvable bucket holding this unit's constraints (`<id>RuntimeOnly`)
    #[inline]
    #[must_use]
    pub fn runtime_only_scope(&self) -> &ResolutionScope {
        &self.runtime_only
    }

    /// Resolvable runtime classpath of this unit (`<id>Classpath`)
    #[inline]
    #[must_use]
    pub fn classpath_scope(&self) -> &ResolutionScope {
        &self.classpath
    }
}

/// Per-unit builder handed to configuration callbacks
///
/// Each combination gets its own configurator; nothing written here is
/// visible to any other unit.
#[derive(Debug)]
pub struct UnitConfigurator<'a> {
    id: &'a UnitId,
    combination: &'a Combination,
    description: String,
    enabled: bool,
    toolchain: Option<String>,
    overrides: BTreeMap<String, String>,
    system_properties: BTreeMap<String, String>,
    test_scope: ScopeName,
    runtime_only: ResolutionScope,
}

impl<'a> UnitConfigurator<'a> {
    pub(crate) fn new(
        id: &'a UnitId,
        combination: &'a Combination,
        description: String,
        test_scope: &str,
    ) -> Self {
        let test_scope = ScopeName::new(test_scope);
        let runtime_only = ResolutionScope::new(ScopeName::new(id.as_str()).suffixed("RuntimeOnly"))
            .with_resolvable(false)
            .extending(test_scope.suffixed("RuntimeClasspath"));
        Self {
            id,
            combination,
            description,
            enabled: true,
            toolchain: None,
            overrides: BTreeMap::new(),
            system_properties: BTreeMap::new(),
            test_scope,
            runtime_only,
        }
    }

    /// Id of the unit being configured
    #[inline]
    #[must_use]
    pub fn id(&self) -> &'a UnitId {
        self.id
    }

    /// The literal version tuple
    #[inline]
    #[must_use]
    pub fn combination(&self) -> &'a Combination {
        self.combination
    }

    /// Versions in dimension order
    #[inline]
    #[must_use]
    pub fn versions(&self) -> &'a [String] {
        self.combination.versions()
    }

    /// Version of a named dimension
    ///
    /// # Errors
    /// Returns [`MatrixError::UnknownDimension`] for unregistered names.
    #[inline]
    pub fn version(&self, dimension: &str) -> Result<&'a str, MatrixError> {
        self.combination.version(dimension)
    }

    /// Destructure the tuple into exactly `N` versions
    ///
    /// # Errors
    /// Returns [`MatrixError::FilterArity`] on arity mismatch.
    #[inline]
    pub fn destructure<const N: usize>(&self) -> Result<[&'a str; N], MatrixError> {
        self.combination.destructure::<N>()
    }

    /// Pin a dependency in this unit's runtime scope only
    ///
    /// # Errors
    /// Returns [`ModelError::ConflictingConstraint`] if another strict pin on
    /// the same coordinate was added to this unit.
    pub fn add_constraint(&mut self, constraint: DependencyConstraint) -> Result<(), ModelError> {
        self.runtime_only
            .add_constraint(constraint, Visibility::RuntimeOnly)
    }

    /// Pin a dependency given in `group:artifact:version[!!]` notation
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidConstraint`] for malformed notation, or
    /// any error of [`UnitConfigurator::add_constraint`].
    pub fn add_constraint_notation(&mut self, notation: &str) -> Result<(), ModelError> {
        let constraint: DependencyConstraint = notation.parse()?;
        self.add_constraint(constraint)
    }

    /// Select the toolchain the unit runs on
    pub fn set_toolchain(&mut self, toolchain: impl Into<String>) {
        self.toolchain = Some(toolchain.into());
    }

    /// Set an opaque environment override
    pub fn set_override(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.overrides.insert(key.into(), value.into());
    }

    /// Set a system property for the running test process
    pub fn set_system_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.system_properties.insert(key.into(), value.into());
    }

    /// Replace the default description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Keep the unit in the plan but never run it
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Whether the unit is still enabled
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn finish(self, group: &str) -> ExecutionUnit {
        let classpath = ResolutionScope::new(ScopeName::new(self.id.as_str()).suffixed("Classpath"))
            .extending(self.runtime_only.name().clone());
        ExecutionUnit {
            id: self.id.clone(),
            description: self.description,
            group: group.to_string(),
            combination: self.combination.clone(),
            enabled: self.enabled,
            toolchain: self.toolchain,
            overrides: self.overrides,
            system_properties: self.system_properties,
            test_scope: self.test_scope,
            runtime_only: self.runtime_only,
            classpath,
        }
    }
}
