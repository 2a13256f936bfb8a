//! Adapter isolation manager
//!
//! Declares one [`AdapterScope`] per (namespace, version), drives each one
//! through `Declared -> Compiled -> Published` and bundles compiled outputs
//! into a [`ConsumerManifest`].
//!
//! Scopes are keyed by the full [`AdapterKey`]; nothing is cached per
//! namespace, so compiling `Lang@3.0` can never observe the pin of
//! `Lang@3.10`.

use crate::compiler::{AdapterCompiler, CompileRequest};
use crate::config::AdapterConfig;
use crate::consumer::ConsumerManifest;
use crate::error::AdapterError;
use crate::namespace::NamespaceRegistry;
use crate::scope::{
    api_scope_name, production_scope_name, test_scope_name, AdapterKey, AdapterScope,
    AdapterTestUnit, ApiScope, SharedScopes, COMMON_COMPILE_ONLY, COMMON_IMPLEMENTATION,
    TEST_COMMON_IMPLEMENTATION, TEST_COMMON_RUNTIME_ONLY,
};
use crate::state::AdapterState;
use compat_model::{DependencyConstraint, LifecycleUnit, ResolutionScope, ScopeName, Visibility};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::HashMap;

/// Outcome of a compile pass
#[derive(Debug, Default)]
pub struct CompileReport {
    /// Adapters compiled in this pass, in declaration order
    pub compiled: Vec<AdapterKey>,
    /// Per-adapter failures, in declaration order
    pub failures: Vec<AdapterError>,
}

impl CompileReport {
    /// Whether every attempted adapter compiled
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, key: AdapterKey, result: Result<(), AdapterError>) {
        match result {
            Ok(()) => self.compiled.push(key),
            Err(err) => self.failures.push(err),
        }
    }
}

/// Owns every adapter scope of one configuration pass
#[derive(Debug, Clone)]
pub struct AdapterIsolationManager {
    config: AdapterConfig,
    shared: SharedScopes,
    apis: Vec<ApiScope>,
    scopes: IndexMap<AdapterKey, AdapterScope>,
    lifecycle: LifecycleUnit,
}

impl AdapterIsolationManager {
    /// Declare scopes for every registered namespace and version
    ///
    /// # Errors
    /// - [`AdapterError::IdentifierCollision`] when two adapters sanitize
    ///   to the same scope name
    /// - [`AdapterError::Model`] if a pin cannot be added
    pub fn plan(registry: &NamespaceRegistry, config: AdapterConfig) -> Result<Self, AdapterError> {
        let mut owners: HashMap<ScopeName, String> = HashMap::new();
        let mut apis = Vec::with_capacity(registry.len());
        let mut scopes = IndexMap::new();

        for namespace in registry.all_namespaces() {
            let target = ScopeName::new(
                namespace
                    .target_scope()
                    .unwrap_or(config.default_target_scope.as_str()),
            );

            let api = ResolutionScope::new(api_scope_name(namespace.name()))
                .extending(ScopeName::new(COMMON_COMPILE_ONLY))
                .extending(ScopeName::new(COMMON_IMPLEMENTATION));
            claim(&mut owners, api.name(), format!("{} (api)", namespace.name()))?;

            for version in namespace.versions() {
                let key = AdapterKey::new(namespace.name(), version.as_str());
                let production_name = production_scope_name(&key);
                let test_name = test_scope_name(&key);
                claim(&mut owners, &production_name, key.to_string())?;
                claim(&mut owners, &test_name, key.to_string())?;

                let pin = namespace
                    .coordinate()
                    .map(|coordinate| DependencyConstraint::strict(coordinate.clone(), version.as_str()));

                let mut production = ResolutionScope::new(production_name.clone())
                    .extending(api.name().clone())
                    .extending(ScopeName::new(COMMON_COMPILE_ONLY))
                    .extending(ScopeName::new(COMMON_IMPLEMENTATION));
                let mut test = ResolutionScope::new(test_name.clone())
                    .extending(production_name.clone())
                    .extending(ScopeName::new(TEST_COMMON_RUNTIME_ONLY))
                    .extending(ScopeName::new(TEST_COMMON_IMPLEMENTATION));
                if let Some(pin) = &pin {
                    production.add_constraint(pin.clone(), Visibility::CompileOnly)?;
                    test.add_constraint(pin.clone(), Visibility::RuntimeOnly)?;
                }

                let test_unit = AdapterTestUnit {
                    id: test_name.to_string(),
                    description: format!("Runs the test suite for the {production_name} adapter."),
                    group: config.group.clone(),
                    scope: test_name,
                };

                scopes.insert(
                    key.clone(),
                    AdapterScope::new(key, production, test, test_unit, target.clone(), pin),
                );
            }

            apis.push(ApiScope {
                namespace: namespace.name().to_string(),
                scope: api,
                exported_to: target,
            });
        }

        let lifecycle = LifecycleUnit::new(
            config.lifecycle_unit.as_str(),
            "Runs the test suites of every compatibility adapter.",
            config.group.as_str(),
        )
        .depending_on(scopes.values().map(|s| s.test_unit().id.clone()));

        tracing::info!(
            "Declared {} adapter scopes across {} namespaces",
            scopes.len(),
            apis.len()
        );

        Ok(Self {
            config,
            shared: SharedScopes::default(),
            apis,
            scopes,
            lifecycle,
        })
    }

    /// Replace the shared scopes, e.g. to add dependencies every adapter needs
    #[must_use]
    pub fn with_shared_scopes(mut self, shared: SharedScopes) -> Self {
        self.shared = shared;
        self
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Shared scopes
    #[inline]
    #[must_use]
    pub fn shared(&self) -> &SharedScopes {
        &self.shared
    }

    /// Per-namespace API scopes
    #[inline]
    #[must_use]
    pub fn apis(&self) -> &[ApiScope] {
        &self.apis
    }

    /// Adapter scopes in declaration order
    pub fn scopes(&self) -> impl ExactSizeIterator<Item = &AdapterScope> + '_ {
        self.scopes.values()
    }

    /// Look up one adapter scope
    #[must_use]
    pub fn scope(&self, namespace: &str, version: &str) -> Option<&AdapterScope> {
        self.scopes.get(&AdapterKey::new(namespace, version))
    }

    /// Aggregate unit depending on every adapter test unit
    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleUnit {
        &self.lifecycle
    }

    /// Number of adapter scopes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Whether no adapter is declared
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Every compile-only pin with the adapter that owns it
    pub fn compile_only_pins(&self) -> impl Iterator<Item = (&AdapterKey, &DependencyConstraint)> + '_ {
        self.scopes
            .values()
            .filter_map(|s| s.compile_only_pin().map(|pin| (s.key(), pin)))
    }

    /// Compile one adapter
    ///
    /// # Errors
    /// - [`AdapterError::UnknownAdapter`] if no such scope exists
    /// - [`AdapterError::IllegalTransition`] unless the scope is `Declared`
    /// - [`AdapterError::Compile`] if the compiler fails; the scope stays
    ///   `Declared`
    pub fn compile<C>(&mut self, namespace: &str, version: &str, compiler: &C) -> Result<(), AdapterError>
    where
        C: AdapterCompiler + ?Sized,
    {
        let key = AdapterKey::new(namespace, version);
        let scope = self
            .scopes
            .get_mut(&key)
            .ok_or_else(|| AdapterError::UnknownAdapter {
                namespace: key.namespace.clone(),
                version: key.version.clone(),
            })?;
        compile_scope(scope, &self.shared, compiler)
    }

    /// Compile every `Declared` adapter one after another
    ///
    /// A failing adapter is reported and skipped; its siblings still compile.
    pub fn compile_all<C>(&mut self, compiler: &C) -> CompileReport
    where
        C: AdapterCompiler + ?Sized,
    {
        let shared = &self.shared;
        let mut report = CompileReport::default();
        for scope in self
            .scopes
            .values_mut()
            .filter(|s| s.state() == AdapterState::Declared)
        {
            let key = scope.key().clone();
            let result = compile_scope(scope, shared, compiler);
            report.record(key, result);
        }
        log_report(&report);
        report
    }

    /// Compile every `Declared` adapter concurrently
    ///
    /// Produces the same report, in the same order, as
    /// [`AdapterIsolationManager::compile_all`].
    pub fn compile_all_parallel<C>(&mut self, compiler: &C) -> CompileReport
    where
        C: AdapterCompiler + Sync + ?Sized,
    {
        let shared = &self.shared;
        let pending: Vec<&mut AdapterScope> = self
            .scopes
            .values_mut()
            .filter(|s| s.state() == AdapterState::Declared)
            .collect();

        let results: Vec<(AdapterKey, Result<(), AdapterError>)> = pending
            .into_par_iter()
            .map(|scope| {
                let key = scope.key().clone();
                (key, compile_scope(scope, shared, compiler))
            })
            .collect();

        let mut report = CompileReport::default();
        for (key, result) in results {
            report.record(key, result);
        }
        log_report(&report);
        report
    }

    /// Bundle every compiled adapter into `manifest`
    ///
    /// All-or-nothing: if any adapter is not `Compiled`, nothing is bundled.
    ///
    /// # Errors
    /// Returns [`AdapterError::IllegalTransition`] for the first adapter that
    /// is not `Compiled`.
    pub fn publish(&mut self, manifest: &mut ConsumerManifest) -> Result<usize, AdapterError> {
        for scope in self.scopes.values() {
            scope.check_transition(AdapterState::Published)?;
        }

        for scope in self.scopes.values_mut() {
            scope.transition(AdapterState::Published)?;
            manifest.bundle(scope);
        }

        tracing::info!(
            "Bundled {} adapters into '{}'",
            self.scopes.len(),
            manifest.name()
        );
        Ok(self.scopes.len())
    }
}

fn claim(
    owners: &mut HashMap<ScopeName, String>,
    name: &ScopeName,
    owner: String,
) -> Result<(), AdapterError> {
    if let Some(first) = owners.get(name) {
        return Err(AdapterError::IdentifierCollision {
            scope: name.to_string(),
            first: first.clone(),
            second: owner,
        });
    }
    owners.insert(name.clone(), owner);
    Ok(())
}

fn compile_scope<C>(
    scope: &mut AdapterScope,
    shared: &SharedScopes,
    compiler: &C,
) -> Result<(), AdapterError>
where
    C: AdapterCompiler + ?Sized,
{
    scope.check_transition(AdapterState::Compiled)?;

    let request = CompileRequest::new(scope.key(), scope.production(), shared);
    match compiler.compile(&request) {
        Ok(output) => {
            tracing::debug!("Compiled adapter {} into {}", scope.key(), output.artifact);
            scope.record_output(output)
        }
        Err(source) => {
            tracing::warn!("Adapter {} failed to compile: {}", scope.key(), source);
            Err(AdapterError::Compile {
                namespace: scope.key().namespace.clone(),
                version: scope.key().version.clone(),
                scope: scope.production().name().to_string(),
                source,
            })
        }
    }
}

fn log_report(report: &CompileReport) {
    tracing::info!(
        "Compiled {} adapters, {} failed",
        report.compiled.len(),
        report.failures.len()
    );
}
