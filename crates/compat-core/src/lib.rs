//! Compat Core
//!
//! Ties the test matrix and the adapter scopes into one explicit
//! [`CompatibilityContext`] and publishes the derived plan to a host build
//! orchestrator.
//!
//! # Two Phases
//!
//! 1. **Planning** ([`CompatibilityContext::plan`]): pure, synchronous,
//!    I/O free. Either the whole plan is built or an error is returned.
//! 2. **Publishing** ([`publish`]): a thin pass forwarding every descriptor
//!    to a [`HostOrchestrator`].
//!
//! # Example
//!
//! ```rust
//! use compat_core::{CompatConfig, CompatibilityContext};
//! use compat_matrix::Filter;
//!
//! let mut context = CompatibilityContext::new(CompatConfig::default());
//! let tests = context.tests_mut();
//! tests.register_dimension("CommonsLang", ["3.0", "3.5", "3.10"]).unwrap();
//! tests.register_dimension("Java", ["8", "11", "17"]).unwrap();
//! tests.filter(Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")]));
//! context.adapters_mut().register("Lang", ["3.0", "3.10"]).unwrap();
//!
//! let plan = context.plan().unwrap();
//! assert_eq!(plan.matrix.len(), 8);
//! assert_eq!(plan.adapters.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod context;
mod error;
mod host;
mod manifest;
mod publish;

// Re-exports
pub use config::CompatConfig;
pub use context::{CompatibilityContext, CompatibilityPlan, PlanReport};
pub use error::{CompatError, HostError, ManifestError};
pub use host::{HostOrchestrator, UnitDescriptor, UnitRegistration};
pub use manifest::{DimensionEntry, Manifest, NamespaceEntry};
pub use publish::{publish, PublishSummary};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        CompatConfig, CompatError, CompatibilityContext, CompatibilityPlan, HostOrchestrator,
        Manifest,
    };
    pub use compat_adapter::{AdapterCompiler, CompileOutput, CompileRequest, Namespace};
    pub use compat_matrix::{Filter, UnitConfigurator};
    pub use compat_model::{Coordinate, DependencyConstraint, Visibility};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
