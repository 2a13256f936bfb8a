//! Host registration pass
//!
//! Maps a finished [`CompatibilityPlan`] onto the host, in a fixed order:
//!
//! 1. every matrix unit with its two scopes and constraints
//! 2. the matrix lifecycle aggregate
//! 3. the shared adapter scopes, the API scopes, every adapter's
//!    production and test scopes with their constraints
//! 4. every adapter test unit
//! 5. the adapter lifecycle aggregate
//!
//! The pass does no validation of its own; it only forwards descriptors.

use crate::context::CompatibilityPlan;
use crate::error::HostError;
use crate::host::{HostOrchestrator, UnitRegistration};
use compat_model::ResolutionScope;
use serde::Serialize;

/// Counts of what one publish pass registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    /// Runnable units, matrix and adapter tests
    pub units: usize,
    /// Units registered disabled
    pub disabled: usize,
    /// Resolution scopes
    pub scopes: usize,
    /// Constraints added to scopes
    pub constraints: usize,
    /// Lifecycle aggregates
    pub lifecycles: usize,
}

/// Register `plan` with `host`
///
/// # Errors
/// Returns the first [`HostError`]; registration stops there.
pub fn publish<H>(plan: &CompatibilityPlan, host: &mut H) -> Result<PublishSummary, HostError>
where
    H: HostOrchestrator + ?Sized,
{
    let mut summary = PublishSummary::default();

    for unit in plan.matrix.units() {
        register_scope(host, unit.runtime_only_scope(), &mut summary)?;
        register_scope(host, unit.classpath_scope(), &mut summary)?;
        host.register_runnable_unit(UnitRegistration::matrix(unit))?;
        summary.units += 1;
        if !unit.is_enabled() {
            summary.disabled += 1;
        }
    }
    host.register_lifecycle(plan.matrix.lifecycle())?;
    summary.lifecycles += 1;

    if plan.adapters.is_empty() {
        tracing::info!(
            "Published {} units ({} disabled), no adapters",
            summary.units,
            summary.disabled
        );
        return Ok(summary);
    }

    for scope in plan.adapters.shared().iter() {
        register_scope(host, scope, &mut summary)?;
    }
    for api in plan.adapters.apis() {
        register_scope(host, &api.scope, &mut summary)?;
    }
    for adapter in plan.adapters.scopes() {
        register_scope(host, adapter.production(), &mut summary)?;
        register_scope(host, adapter.test(), &mut summary)?;
    }
    for adapter in plan.adapters.scopes() {
        host.register_runnable_unit(UnitRegistration::adapter_test(adapter.test_unit()))?;
        summary.units += 1;
    }
    host.register_lifecycle(plan.adapters.lifecycle())?;
    summary.lifecycles += 1;

    tracing::info!(
        "Published {} units ({} disabled), {} scopes, {} constraints",
        summary.units,
        summary.disabled,
        summary.scopes,
        summary.constraints
    );
    Ok(summary)
}

fn register_scope<H>(
    host: &mut H,
    scope: &ResolutionScope,
    summary: &mut PublishSummary,
) -> Result<(), HostError>
where
    H: HostOrchestrator + ?Sized,
{
    host.register_scope(scope)?;
    summary.scopes += 1;
    for scoped in scope.constraints() {
        host.add_constraint(scope.name(), &scoped.constraint, scoped.visibility)?;
        summary.constraints += 1;
    }
    Ok(())
}
