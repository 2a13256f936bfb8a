//! Adapter compilation scopes
//!
//! For namespace `Lang` and version `3.10` the manager declares:
//!
//! - `compatLangApi`: API scope shared by all `Lang` adapters, exported to
//!   the target scope
//! - `compatLang3_10`: production scope holding the compile-only pin
//! - `testCompatLang3_10`: test scope holding the same pin at runtime,
//!   plus one test unit of the same name
//!
//! Every scope owns its constraint list. Production scopes of one namespace
//! are siblings: none of them extends another.

use crate::error::AdapterError;
use crate::state::AdapterState;
use compat_model::ident::{pascal_segment, version_segment};
use compat_model::{DependencyConstraint, ResolutionScope, ScopeName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared scope every adapter compile extends
pub const COMMON_COMPILE_ONLY: &str = "commonCompileOnly";
/// Shared scope every adapter compile and runtime extends
pub const COMMON_IMPLEMENTATION: &str = "commonImplementation";
/// Shared scope every adapter test extends
pub const TEST_COMMON_IMPLEMENTATION: &str = "testCommonImplementation";
/// Shared runtime-only scope every adapter test extends
pub const TEST_COMMON_RUNTIME_ONLY: &str = "testCommonRuntimeOnly";

/// Identity of one adapter
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdapterKey {
    /// Namespace name
    pub namespace: String,
    /// Version within the namespace
    pub version: String,
}

impl AdapterKey {
    /// Create key
    #[must_use]
    pub fn new(namespace: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for AdapterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.namespace, self.version)
    }
}

pub(crate) fn api_scope_name(namespace: &str) -> ScopeName {
    ScopeName::new(format!("compat{}Api", pascal_segment(namespace)))
}

pub(crate) fn production_scope_name(key: &AdapterKey) -> ScopeName {
    ScopeName::new(format!(
        "compat{}{}",
        pascal_segment(&key.namespace),
        version_segment(&key.version)
    ))
}

pub(crate) fn test_scope_name(key: &AdapterKey) -> ScopeName {
    ScopeName::new(format!(
        "testCompat{}{}",
        pascal_segment(&key.namespace),
        version_segment(&key.version)
    ))
}

/// The four shared scopes adapters extend
///
/// Constraints added here are visible to every adapter; they are the only
/// constraints two adapters ever have in common.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedScopes {
    /// `commonCompileOnly`
    pub compile_only: ResolutionScope,
    /// `commonImplementation`
    pub implementation: ResolutionScope,
    /// `testCommonImplementation`
    pub test_implementation: ResolutionScope,
    /// `testCommonRuntimeOnly`
    pub test_runtime_only: ResolutionScope,
}

impl SharedScopes {
    /// Scopes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResolutionScope> + '_ {
        [
            &self.compile_only,
            &self.implementation,
            &self.test_implementation,
            &self.test_runtime_only,
        ]
        .into_iter()
    }

    /// Constraints every adapter compile sees
    pub fn compile_view(&self) -> impl Iterator<Item = &DependencyConstraint> + '_ {
        self.compile_only
            .compile_view()
            .chain(self.implementation.compile_view())
    }
}

impl Default for SharedScopes {
    fn default() -> Self {
        Self {
            compile_only: ResolutionScope::new(ScopeName::new(COMMON_COMPILE_ONLY))
                .with_resolvable(false),
            implementation: ResolutionScope::new(ScopeName::new(COMMON_IMPLEMENTATION))
                .with_resolvable(false),
            test_implementation: ResolutionScope::new(ScopeName::new(TEST_COMMON_IMPLEMENTATION))
                .with_resolvable(false),
            test_runtime_only: ResolutionScope::new(ScopeName::new(TEST_COMMON_RUNTIME_ONLY))
                .with_resolvable(false),
        }
    }
}

/// Per-namespace API scope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiScope {
    /// Namespace
    pub namespace: String,
    /// `compat<Ns>Api`, extending the common scopes
    pub scope: ResolutionScope,
    /// Scope receiving the API output
    pub exported_to: ScopeName,
}

/// Test unit running one adapter's test suite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterTestUnit {
    /// Unit id, same as the test scope name
    pub id: String,
    /// Human-readable description
    pub description: String,
    /// Host grouping label
    pub group: String,
    /// Scope whose runtime classpath the unit runs on
    pub scope: ScopeName,
}

/// Output the compiler produced for one adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOutput {
    /// Opaque handle of the compiled artifact, e.g. a class directory
    pub artifact: String,
}

impl CompileOutput {
    /// Create output
    #[must_use]
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
        }
    }
}

/// Isolated compilation scope of one (namespace, version)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdapterScope {
    key: AdapterKey,
    production: ResolutionScope,
    test: ResolutionScope,
    test_unit: AdapterTestUnit,
    exported_to: ScopeName,
    pin: Option<DependencyConstraint>,
    state: AdapterState,
    output: Option<CompileOutput>,
}

impl AdapterScope {
    pub(crate) fn new(
        key: AdapterKey,
        production: ResolutionScope,
        test: ResolutionScope,
        test_unit: AdapterTestUnit,
        exported_to: ScopeName,
        pin: Option<DependencyConstraint>,
    ) -> Self {
        Self {
            key,
            production,
            test,
            test_unit,
            exported_to,
            pin,
            state: AdapterState::Declared,
            output: None,
        }
    }

    /// Adapter identity
    #[inline]
    #[must_use]
    pub fn key(&self) -> &AdapterKey {
        &self.key
    }

    /// Production scope (`compat<Ns><ver>`)
    #[inline]
    #[must_use]
    pub fn production(&self) -> &ResolutionScope {
        &self.production
    }

    /// Test scope (`testCompat<Ns><ver>`)
    #[inline]
    #[must_use]
    pub fn test(&self) -> &ResolutionScope {
        &self.test
    }

    /// The adapter's test unit
    #[inline]
    #[must_use]
    pub fn test_unit(&self) -> &AdapterTestUnit {
        &self.test_unit
    }

    /// Scope receiving the compiled output
    #[inline]
    #[must_use]
    pub fn exported_to(&self) -> &ScopeName {
        &self.exported_to
    }

    /// The compile-only pin, if the namespace names a coordinate
    #[inline]
    #[must_use]
    pub fn compile_only_pin(&self) -> Option<&DependencyConstraint> {
        self.pin.as_ref()
    }

    /// Lifecycle state
    #[inline]
    #[must_use]
    pub fn state(&self) -> AdapterState {
        self.state
    }

    /// Compiled output, once compiled
    #[inline]
    #[must_use]
    pub fn output(&self) -> Option<&CompileOutput> {
        self.output.as_ref()
    }

    pub(crate) fn check_transition(&self, to: AdapterState) -> Result<(), AdapterError> {
        if self.state.can_transition_to(to) {
            Ok(())
        } else {
            Err(AdapterError::IllegalTransition {
                adapter: self.key.to_string(),
                from: self.state,
                to,
            })
        }
    }

    pub(crate) fn transition(&mut self, to: AdapterState) -> Result<(), AdapterError> {
        self.check_transition(to)?;
        tracing::debug!("Adapter {} {} -> {}", self.key, self.state, to);
        self.state = to;
        Ok(())
    }

    pub(crate) fn record_output(&mut self, output: CompileOutput) -> Result<(), AdapterError> {
        self.transition(AdapterState::Compiled)?;
        self.output = Some(output);
        Ok(())
    }
}
