//! Host orchestrator seam
//!
//! The host build tool owns the task graph, dependency resolution and
//! toolchains. The engine talks to it through [`HostOrchestrator`] and hands
//! over complete descriptors; the host never looks anything up by name.

use crate::error::HostError;
use compat_adapter::AdapterTestUnit;
use compat_matrix::ExecutionUnit;
use compat_model::{DependencyConstraint, LifecycleUnit, ResolutionScope, ScopeName, Visibility};

/// What a runnable unit executes
#[derive(Debug, Clone, Copy)]
pub enum UnitDescriptor<'a> {
    /// One combination of the test matrix
    Matrix(&'a ExecutionUnit),
    /// The test suite of one adapter
    AdapterTest(&'a AdapterTestUnit),
}

/// One runnable unit handed to the host
#[derive(Debug, Clone, Copy)]
pub struct UnitRegistration<'a> {
    /// Unit id
    pub id: &'a str,
    /// Disabled units are registered but never run
    pub enabled: bool,
    /// Complete description of the unit
    pub descriptor: UnitDescriptor<'a>,
}

impl<'a> UnitRegistration<'a> {
    /// Registration of a matrix unit
    #[must_use]
    pub fn matrix(unit: &'a ExecutionUnit) -> Self {
        Self {
            id: unit.id().as_str(),
            enabled: unit.is_enabled(),
            descriptor: UnitDescriptor::Matrix(unit),
        }
    }

    /// Registration of an adapter test unit
    #[must_use]
    pub fn adapter_test(unit: &'a AdapterTestUnit) -> Self {
        Self {
            id: unit.id.as_str(),
            enabled: true,
            descriptor: UnitDescriptor::AdapterTest(unit),
        }
    }
}

/// The host build orchestrator
pub trait HostOrchestrator {
    /// Declare a resolution scope: its name, parents and resolvability
    ///
    /// # Errors
    /// Host-specific.
    fn register_scope(&mut self, scope: &ResolutionScope) -> Result<(), HostError>;

    /// Add one constraint to a declared scope
    ///
    /// # Errors
    /// Host-specific.
    fn add_constraint(
        &mut self,
        scope: &ScopeName,
        constraint: &DependencyConstraint,
        visibility: Visibility,
    ) -> Result<(), HostError>;

    /// Register a runnable unit
    ///
    /// # Errors
    /// Host-specific.
    fn register_runnable_unit(&mut self, registration: UnitRegistration<'_>) -> Result<(), HostError>;

    /// Register an aggregate unit
    ///
    /// # Errors
    /// Host-specific.
    fn register_lifecycle(&mut self, lifecycle: &LifecycleUnit) -> Result<(), HostError>;
}
