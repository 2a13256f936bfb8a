//! Compiler seam
//!
//! Compiling sources is the host's job. The manager hands the compiler one
//! [`CompileRequest`] per adapter, built only from that adapter's scope and
//! the shared scopes.

use crate::scope::{AdapterKey, CompileOutput, SharedScopes};
use compat_model::{BoxError, DependencyConstraint, ResolutionScope};

/// Everything one adapter compile may see
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    key: &'a AdapterKey,
    scope: &'a ResolutionScope,
    shared: &'a SharedScopes,
}

impl<'a> CompileRequest<'a> {
    pub(crate) fn new(
        key: &'a AdapterKey,
        scope: &'a ResolutionScope,
        shared: &'a SharedScopes,
    ) -> Self {
        Self { key, scope, shared }
    }

    /// Adapter being compiled
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'a AdapterKey {
        self.key
    }

    /// The adapter's production scope
    #[inline]
    #[must_use]
    pub fn scope(&self) -> &'a ResolutionScope {
        self.scope
    }

    /// Constraints visible to this compile: the scope's own compile view
    /// followed by the shared scopes
    #[must_use]
    pub fn resolution_view(&self) -> Vec<&'a DependencyConstraint> {
        self.scope
            .compile_view()
            .chain(self.shared.compile_view())
            .collect()
    }
}

/// Compiles one adapter scope
pub trait AdapterCompiler {
    /// Compile the sources of `request`'s scope
    ///
    /// # Errors
    /// Any compiler failure; it is reported for this adapter only.
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, BoxError>;
}

impl<F> AdapterCompiler for F
where
    F: Fn(&CompileRequest<'_>) -> Result<CompileOutput, BoxError>,
{
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, BoxError> {
        self(request)
    }
}
