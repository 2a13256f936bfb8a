//! Compatibility context
//!
//! The explicit context object of one configuration pass. It owns the test
//! matrix declaration and the adapter namespaces; [`CompatibilityContext::plan`]
//! derives everything else. Several contexts can live in one process.

use crate::config::CompatConfig;
use crate::error::CompatError;
use crate::host::HostOrchestrator;
use crate::publish::{publish, PublishSummary};
use compat_adapter::{AdapterIsolationManager, AdapterScope, ApiScope, NamespaceRegistry};
use compat_matrix::{ExecutionUnit, MatrixConfig, MatrixPlan, TestMatrix};
use compat_model::LifecycleUnit;
use serde::Serialize;

/// Declaration side of one configuration pass
#[derive(Debug)]
pub struct CompatibilityContext {
    config: CompatConfig,
    tests: TestMatrix,
    adapters: NamespaceRegistry,
}

impl CompatibilityContext {
    /// Create empty context
    #[must_use]
    pub fn new(config: CompatConfig) -> Self {
        let tests = TestMatrix::new(config.matrix.clone());
        Self {
            config,
            tests,
            adapters: NamespaceRegistry::new(),
        }
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CompatConfig {
        &self.config
    }

    /// Matrix settings
    #[inline]
    #[must_use]
    pub fn matrix_config(&self) -> &MatrixConfig {
        &self.config.matrix
    }

    /// The test matrix declaration
    #[inline]
    #[must_use]
    pub fn tests(&self) -> &TestMatrix {
        &self.tests
    }

    /// Mutable test matrix declaration
    #[inline]
    pub fn tests_mut(&mut self) -> &mut TestMatrix {
        &mut self.tests
    }

    /// Adapter namespaces
    #[inline]
    #[must_use]
    pub fn adapters(&self) -> &NamespaceRegistry {
        &self.adapters
    }

    /// Mutable adapter namespaces
    #[inline]
    pub fn adapters_mut(&mut self) -> &mut NamespaceRegistry {
        &mut self.adapters
    }

    /// Derive the complete plan
    ///
    /// # Errors
    /// Any configuration error of the matrix or the adapters.
    pub fn plan(&self) -> Result<CompatibilityPlan, CompatError> {
        let matrix = self.tests.generate()?;
        let adapters = AdapterIsolationManager::plan(&self.adapters, self.config.adapters.clone())?;
        Ok(CompatibilityPlan { matrix, adapters })
    }

    /// Plan, then register the plan with `host`
    ///
    /// Nothing reaches the host unless planning succeeds.
    ///
    /// # Errors
    /// Configuration errors from planning, or the first host error.
    pub fn publish<H>(&self, host: &mut H) -> Result<PublishSummary, CompatError>
    where
        H: HostOrchestrator + ?Sized,
    {
        let plan = self.plan()?;
        Ok(publish(&plan, host)?)
    }
}

impl Default for CompatibilityContext {
    fn default() -> Self {
        Self::new(CompatConfig::default())
    }
}

/// Everything derived from one context
#[derive(Debug, Clone)]
pub struct CompatibilityPlan {
    /// Test matrix units and lifecycle
    pub matrix: MatrixPlan,
    /// Adapter scopes
    pub adapters: AdapterIsolationManager,
}

impl CompatibilityPlan {
    /// Serializable view of the plan
    #[must_use]
    pub fn report(&self) -> PlanReport<'_> {
        PlanReport {
            units: self.matrix.units(),
            lifecycle: self.matrix.lifecycle(),
            apis: self.adapters.apis(),
            adapters: self.adapters.scopes().collect(),
            adapter_lifecycle: self.adapters.lifecycle(),
        }
    }
}

/// Serializable view of a [`CompatibilityPlan`]
#[derive(Debug, Serialize)]
pub struct PlanReport<'a> {
    /// Matrix units in generation order
    pub units: &'a [ExecutionUnit],
    /// Matrix lifecycle aggregate
    pub lifecycle: &'a LifecycleUnit,
    /// Adapter API scopes
    pub apis: &'a [ApiScope],
    /// Adapter scopes in declaration order
    pub adapters: Vec<&'a AdapterScope>,
    /// Adapter lifecycle aggregate
    pub adapter_lifecycle: &'a LifecycleUnit,
}
