//! Testing utilities for the compat workspace
//!
//! Shared hosts, compilers and fixtures.

#![allow(missing_docs)]

use compat_adapter::{AdapterCompiler, AdapterKey, CompileOutput, CompileRequest, Namespace};
use compat_core::{
    CompatConfig, CompatibilityContext, HostError, HostOrchestrator, UnitDescriptor,
    UnitRegistration,
};
use compat_matrix::Filter;
use compat_model::{
    BoxError, Coordinate, DependencyConstraint, LifecycleUnit, ResolutionScope, ScopeName,
    Visibility,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

/// One call the host received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Scope {
        name: String,
        extends: Vec<String>,
        resolvable: bool,
    },
    Constraint {
        scope: String,
        notation: String,
        visibility: Visibility,
    },
    Unit {
        id: String,
        enabled: bool,
        adapter_test: bool,
    },
    Lifecycle {
        name: String,
        depends_on: Vec<String>,
    },
}

/// Host that records every call and can reject chosen names
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    reject: HashSet<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any registration whose name or id equals `name`
    pub fn rejecting(mut self, name: impl Into<String>) -> Self {
        self.reject.insert(name.into());
        self
    }

    fn check(&self, name: &str) -> Result<(), HostError> {
        if self.reject.contains(name) {
            return Err(HostError::Rejected {
                name: name.to_string(),
                reason: "rejected by test host".to_string(),
            });
        }
        Ok(())
    }

    pub fn unit_ids(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Unit { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn enabled_unit_ids(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Unit { id, enabled: true, .. } => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Constraint notations added to `scope`, with their visibility
    pub fn constraints_of(&self, scope: &str) -> Vec<(String, Visibility)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Constraint {
                    scope: s,
                    notation,
                    visibility,
                } if s == scope => Some((notation.clone(), *visibility)),
                _ => None,
            })
            .collect()
    }

    pub fn lifecycle(&self, name: &str) -> Option<Vec<String>> {
        self.calls.iter().find_map(|c| match c {
            HostCall::Lifecycle { name: n, depends_on } if n == name => Some(depends_on.clone()),
            _ => None,
        })
    }
}

impl HostOrchestrator for RecordingHost {
    fn register_scope(&mut self, scope: &ResolutionScope) -> Result<(), HostError> {
        self.check(scope.name().as_str())?;
        self.calls.push(HostCall::Scope {
            name: scope.name().to_string(),
            extends: scope.extends().iter().map(ToString::to_string).collect(),
            resolvable: scope.is_resolvable(),
        });
        Ok(())
    }

    fn add_constraint(
        &mut self,
        scope: &ScopeName,
        constraint: &DependencyConstraint,
        visibility: Visibility,
    ) -> Result<(), HostError> {
        self.calls.push(HostCall::Constraint {
            scope: scope.to_string(),
            notation: constraint.notation(),
            visibility,
        });
        Ok(())
    }

    fn register_runnable_unit(&mut self, registration: UnitRegistration<'_>) -> Result<(), HostError> {
        self.check(registration.id)?;
        self.calls.push(HostCall::Unit {
            id: registration.id.to_string(),
            enabled: registration.enabled,
            adapter_test: matches!(registration.descriptor, UnitDescriptor::AdapterTest(_)),
        });
        Ok(())
    }

    fn register_lifecycle(&mut self, lifecycle: &LifecycleUnit) -> Result<(), HostError> {
        self.check(&lifecycle.name)?;
        self.calls.push(HostCall::Lifecycle {
            name: lifecycle.name.clone(),
            depends_on: lifecycle.depends_on.clone(),
        });
        Ok(())
    }
}

/// Compiler that records each request's resolution view and fails on demand
#[derive(Debug, Default)]
pub struct FakeCompiler {
    failing: HashSet<AdapterKey>,
    views: Mutex<BTreeMap<AdapterKey, Vec<String>>>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, namespace: &str, version: &str) -> Self {
        self.failing.insert(AdapterKey::new(namespace, version));
        self
    }

    /// Constraint notations each compiled adapter could see
    pub fn views(&self) -> BTreeMap<AdapterKey, Vec<String>> {
        self.views.lock().unwrap().clone()
    }
}

impl AdapterCompiler for FakeCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, BoxError> {
        let view = request
            .resolution_view()
            .into_iter()
            .map(DependencyConstraint::notation)
            .collect();
        self.views.lock().unwrap().insert(request.key().clone(), view);
        if self.failing.contains(request.key()) {
            return Err(format!("compilation of {} failed", request.key()).into());
        }
        Ok(CompileOutput::new(format!(
            "build/classes/{}",
            request.scope().name()
        )))
    }
}

pub fn commons_lang() -> Coordinate {
    Coordinate::new("org.apache.commons", "commons-lang3").unwrap()
}

/// `{CommonsLang: [3.0, 3.5, 3.10]} x {Java: [8, 11, 17]}` minus `(3.0, 17)`,
/// pinning commons-lang3 per unit, plus a `Lang` namespace for 3.0 and 3.10
pub fn commons_lang_by_java() -> CompatibilityContext {
    let mut context = CompatibilityContext::new(CompatConfig::default());
    let tests = context.tests_mut();
    tests
        .register_dimension("CommonsLang", ["3.0", "3.5", "3.10"])
        .unwrap();
    tests.register_dimension("Java", ["8", "11", "17"]).unwrap();
    tests.filter(Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")]));
    tests.each_unit(|unit| {
        let lang = unit.version("CommonsLang")?;
        unit.add_constraint(DependencyConstraint::strict(commons_lang(), lang))?;
        Ok(())
    });

    context
        .adapters_mut()
        .register_namespace(
            Namespace::new("Lang", ["3.0", "3.10"]).pinning(commons_lang()),
        )
        .unwrap();
    context
}

pub const COMMONS_LANG_BY_JAVA_MANIFEST: &str = r#"
[[dimension]]
name = "CommonsLang"
versions = ["3.0", "3.5", "3.10"]
coordinate = "org.apache.commons:commons-lang3"
property = "commons.lang.version"

[[dimension]]
name = "Java"
versions = ["8", "11", "17"]
toolchain = true

[[exclude]]
CommonsLang = "3.0"
Java = "17"

[[namespace]]
name = "Lang"
versions = ["3.0", "3.10"]
coordinate = "org.apache.commons:commons-lang3"
"#;
