//! Compat Matrix
//!
//! Multi-dimensional compatibility test matrices.
//!
//! # Core Concepts
//!
//! - [`DimensionRegistry`]: named, ordered version lists
//! - [`CombinationGenerator`]: filtered cartesian product, last dimension fastest
//! - [`NameResolver`]: stable, sanitized, collision-checked unit ids
//! - [`TestMatrix`]: declaration plus the pure [`TestMatrix::generate`] pass
//!   producing [`ExecutionUnit`] descriptors
//!
//! # Example
//!
//! ```rust
//! use compat_matrix::{Filter, MatrixConfig, TestMatrix};
//!
//! let mut matrix = TestMatrix::new(MatrixConfig::default().with_test_scope("functionalTest"));
//! matrix.register_dimension("Gradle", ["7.6", "8.5"]).unwrap();
//! matrix.register_dimension("Java", ["11", "17"]).unwrap();
//! matrix.filter(Filter::destructured(|[gradle, java]: [&str; 2]| !(gradle == "7.6" && java == "17")));
//!
//! let plan = matrix.generate().unwrap();
//! let ids: Vec<_> = plan.ids().map(ToString::to_string).collect();
//! assert_eq!(ids[0], "functionalTestCompatibilityWithGradle7_6AndJava11");
//! assert_eq!(plan.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod combination;
mod config;
mod dimension;
mod error;
mod filter;
mod generator;
mod naming;
mod synthesizer;
mod unit;

// Re-exports
pub use combination::Combination;
pub use config::MatrixConfig;
pub use dimension::{Dimension, DimensionRegistry};
pub use error::MatrixError;
pub use filter::Filter;
pub use generator::{CombinationGenerator, Enumeration};
pub use naming::{NameResolver, UnitId};
pub use synthesizer::{MatrixPlan, TestMatrix, UnitCallback};
pub use unit::{ExecutionUnit, UnitConfigurator};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        Combination, ExecutionUnit, Filter, MatrixConfig, MatrixError, MatrixPlan, TestMatrix,
        UnitConfigurator, UnitId,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
