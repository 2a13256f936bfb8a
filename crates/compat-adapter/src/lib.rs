//! Compat Adapter
//!
//! Isolated compilation scopes for building one codebase against several
//! mutually incompatible releases of the same dependency.
//!
//! # Core Concepts
//!
//! - [`NamespaceRegistry`]: adapter namespaces and their versions
//! - [`AdapterIsolationManager`]: one [`AdapterScope`] per (namespace, version)
//!   carrying a compile-only pin
//! - [`AdapterCompiler`]: the host's compiler, called once per scope
//! - [`ConsumerManifest`]: the bundling artifact, checked so that no
//!   compile-only pin reaches a runtime graph
//!
//! # Example
//!
//! ```rust
//! use compat_adapter::{
//!     AdapterConfig, AdapterIsolationManager, CompileOutput, CompileRequest, ConsumerManifest,
//!     Namespace, NamespaceRegistry,
//! };
//! use compat_model::{BoxError, Coordinate};
//!
//! let mut registry = NamespaceRegistry::new();
//! registry.register_namespace(
//!     Namespace::new("Lang", ["3.0", "3.10"])
//!         .pinning(Coordinate::new("org.apache.commons", "commons-lang3").unwrap()),
//! ).unwrap();
//!
//! let mut manager = AdapterIsolationManager::plan(&registry, AdapterConfig::default()).unwrap();
//! let compiler = |request: &CompileRequest<'_>| -> Result<CompileOutput, BoxError> {
//!     Ok(CompileOutput::new(format!("classes/{}", request.scope().name())))
//! };
//! assert!(manager.compile_all(&compiler).is_success());
//!
//! let mut jar = ConsumerManifest::new("example");
//! manager.publish(&mut jar).unwrap();
//! jar.verify_runtime_exclusion(&manager).unwrap();
//! assert!(jar.runtime_requirements().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod compiler;
mod config;
mod consumer;
mod error;
mod manager;
mod namespace;
mod scope;
mod state;

// Re-exports
pub use compiler::{AdapterCompiler, CompileRequest};
pub use config::AdapterConfig;
pub use consumer::{BundledAdapter, ConsumerManifest};
pub use error::AdapterError;
pub use manager::{AdapterIsolationManager, CompileReport};
pub use namespace::{Namespace, NamespaceRegistry};
pub use scope::{
    AdapterKey, AdapterScope, AdapterTestUnit, ApiScope, CompileOutput, SharedScopes,
    COMMON_COMPILE_ONLY, COMMON_IMPLEMENTATION, TEST_COMMON_IMPLEMENTATION,
    TEST_COMMON_RUNTIME_ONLY,
};
pub use state::AdapterState;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
