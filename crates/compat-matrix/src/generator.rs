//! Combination generator
//!
//! Enumerates the cartesian product of a [`DimensionRegistry`] in a fixed
//! order: the last-registered dimension varies fastest, like an odometer.
//! Filters run on each tuple before it is emitted, so dropped combinations
//! never reach naming or unit synthesis. Dimensions the filters declare are
//! checked once before enumeration starts.

use crate::combination::Combination;
use crate::dimension::{Dimension, DimensionRegistry};
use crate::error::MatrixError;
use crate::filter::{accepts_all, validate_all, Filter};
use std::sync::Arc;

const NO_FILTERS: &[Filter] = &[];

/// Result of one enumeration pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    /// Surviving combinations, in product order
    pub combinations: Vec<Combination>,
    /// Combinations enumerated before filtering
    pub enumerated: usize,
}

/// Filtered cartesian product over a registry
#[derive(Debug, Clone, Copy)]
pub struct CombinationGenerator<'a> {
    registry: &'a DimensionRegistry,
    filters: &'a [Filter],
    fail_on_empty_matrix: bool,
}

impl<'a> CombinationGenerator<'a> {
    /// Create generator that accepts every combination
    #[must_use]
    pub fn new(registry: &'a DimensionRegistry) -> Self {
        Self {
            registry,
            filters: NO_FILTERS,
            fail_on_empty_matrix: false,
        }
    }

    /// Apply filters; a combination survives if every filter keeps it
    #[inline]
    #[must_use]
    pub fn with_filters(mut self, filters: &'a [Filter]) -> Self {
        self.filters = filters;
        self
    }

    /// Fail with [`MatrixError::EmptyMatrix`] when nothing survives
    #[inline]
    #[must_use]
    pub fn fail_on_empty_matrix(mut self, fail: bool) -> Self {
        self.fail_on_empty_matrix = fail;
        self
    }

    /// Surviving combinations in product order
    ///
    /// # Errors
    /// See [`CombinationGenerator::run`].
    pub fn enumerate(&self) -> Result<Vec<Combination>, MatrixError> {
        self.run().map(|e| e.combinations)
    }

    /// Enumerate and filter the full product
    ///
    /// # Errors
    /// - [`MatrixError::UnknownDimension`] for a dimension a filter declares
    ///   or reads that is not registered
    /// - Any other error a filter returns
    /// - [`MatrixError::EmptyMatrix`] if nothing survives and
    ///   `fail_on_empty_matrix` is set
    pub fn run(&self) -> Result<Enumeration, MatrixError> {
        validate_all(self.filters, self.registry)?;

        let dimensions: Vec<&Dimension> = self.registry.all_dimensions().collect();
        if dimensions.is_empty() {
            return self.finish(Vec::new(), 0);
        }

        let names: Arc<[String]> = dimensions.iter().map(|d| d.name().to_string()).collect();
        let mut cursor = vec![0usize; dimensions.len()];
        let mut combinations = Vec::new();
        let mut enumerated = 0usize;

        'product: loop {
            let versions = cursor
                .iter()
                .zip(&dimensions)
                .map(|(&index, dimension)| dimension.versions()[index].clone())
                .collect();
            let combination = Combination::new(Arc::clone(&names), versions);
            enumerated += 1;

            if accepts_all(self.filters, &combination)? {
                combinations.push(combination);
            } else {
                tracing::trace!("Filtered out {}", combination);
            }

            // Advance from the last dimension; carry leftwards on wrap.
            let mut position = dimensions.len();
            loop {
                if position == 0 {
                    break 'product;
                }
                position -= 1;
                cursor[position] += 1;
                if cursor[position] < dimensions[position].len() {
                    break;
                }
                cursor[position] = 0;
            }
        }

        self.finish(combinations, enumerated)
    }

    fn finish(&self, combinations: Vec<Combination>, enumerated: usize) -> Result<Enumeration, MatrixError> {
        if combinations.is_empty() {
            if self.fail_on_empty_matrix {
                return Err(MatrixError::EmptyMatrix {
                    dimensions: self.registry.names(),
                    enumerated,
                });
            }
            tracing::warn!(
                "Compatibility matrix is empty ({} combinations enumerated)",
                enumerated
            );
        }
        tracing::debug!(
            "Enumerated {} combinations, {} survive filtering",
            enumerated,
            combinations.len()
        );
        Ok(Enumeration {
            combinations,
            enumerated,
        })
    }
}
