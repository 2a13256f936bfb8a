//! Compat Model
//!
//! Foundation values shared by the matrix generator and the adapter
//! isolation manager.
//!
//! # Overview
//!
//! - [`ident`]: host-safe identifier segments derived from names and versions
//! - [`Coordinate`] / [`DependencyConstraint`]: what gets pinned, and how hard
//! - [`ResolutionScope`]: a named set of scoped constraints with an explicit
//!   compile/runtime [`Visibility`]
//!
//! # Example
//!
//! ```rust
//! use compat_model::{DependencyConstraint, ResolutionScope, ScopeName, Visibility};
//!
//! let pin: DependencyConstraint = "org.apache.commons:commons-lang3:3.10!!".parse().unwrap();
//! assert!(pin.is_strict());
//!
//! let mut scope = ResolutionScope::new(ScopeName::new("compatLang3_10"));
//! scope.add_constraint(pin, Visibility::CompileOnly).unwrap();
//! assert_eq!(scope.runtime_view().count(), 0);
//! ```

#![warn(missing_docs)]

pub mod coordinate;
pub mod error;
pub mod ident;
pub mod lifecycle;
pub mod scope;

// Re-exports
pub use coordinate::{Coordinate, DependencyConstraint};
pub use error::ModelError;
pub use lifecycle::LifecycleUnit;
pub use scope::{ResolutionScope, ScopeName, ScopedConstraint, Visibility};

/// Boxed error returned by user-supplied callbacks and compilers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
