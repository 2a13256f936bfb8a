//! Filter predicates
//!
//! A [`Filter`] decides whether a combination survives. Predicates are pure
//! functions of the combination; they may read versions positionally, by
//! name, or by destructuring the whole tuple. A predicate that only reads
//! some dimensions simply does not constrain the others.
//!
//! Dimensions a filter names up front (every `exclude` pair, or whatever
//! [`Filter::referencing`] declares) are checked against the registry
//! before any combination is enumerated.

use crate::combination::Combination;
use crate::dimension::DimensionRegistry;
use crate::error::MatrixError;
use std::fmt;

type Predicate = dyn Fn(&Combination) -> Result<bool, MatrixError>;

/// A combination predicate; `true` keeps the combination
pub struct Filter {
    label: String,
    references: Vec<String>,
    predicate: Box<Predicate>,
}

impl Filter {
    /// Create filter from a fallible predicate
    ///
    /// Use [`Combination::version`] with `?` for named access; referencing
    /// an unregistered dimension aborts generation with
    /// [`MatrixError::UnknownDimension`].
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Combination) -> Result<bool, MatrixError> + 'static,
    {
        Self {
            label: "predicate".to_string(),
            references: Vec::new(),
            predicate: Box::new(predicate),
        }
    }

    /// Filter that keeps every combination
    #[must_use]
    pub fn accept_all() -> Self {
        Self::new(|_| Ok(true)).labelled("accept all")
    }

    /// Filter over a same-arity destructured tuple
    ///
    /// ```rust
    /// use compat_matrix::Filter;
    ///
    /// let filter = Filter::destructured(|[lang, java]: [&str; 2]| !(lang == "3.0" && java == "17"));
    /// # let _ = filter;
    /// ```
    pub fn destructured<const N: usize, F>(predicate: F) -> Self
    where
        F: Fn([&str; N]) -> bool + 'static,
    {
        Self::new(move |combination| Ok(predicate(combination.destructure::<N>()?)))
            .labelled(format!("destructured/{N}"))
    }

    /// Filter that drops every combination matching all given pairs
    ///
    /// `Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")])` drops
    /// exactly the combinations where both hold.
    pub fn exclude<I, D, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (D, V)>,
        D: Into<String>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(d, v)| (d.into(), v.into()))
            .collect();
        let label = format!(
            "exclude {}",
            pairs
                .iter()
                .map(|(d, v)| format!("{d}={v}"))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let references = pairs.iter().map(|(d, _)| d.clone()).collect::<Vec<_>>();
        Self::new(move |combination| {
            let mut matches = true;
            for (dimension, version) in &pairs {
                if combination.version(dimension)? != version {
                    matches = false;
                }
            }
            Ok(pairs.is_empty() || !matches)
        })
        .labelled(label)
        .referencing(references)
    }

    /// Declare dimensions the predicate reads by name
    ///
    /// Declared names must be registered; generation fails with
    /// [`MatrixError::UnknownDimension`] before enumeration otherwise,
    /// even when no combination would reach this filter.
    #[must_use]
    pub fn referencing<I, D>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        for dimension in dimensions {
            let dimension = dimension.into();
            if !self.references.contains(&dimension) {
                self.references.push(dimension);
            }
        }
        self
    }

    /// Attach a label used in logs
    #[must_use]
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Filter label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Dimensions declared as read by this filter
    #[inline]
    #[must_use]
    pub fn references(&self) -> &[String] {
        &self.references
    }

    /// Check every declared dimension against `registry`
    ///
    /// # Errors
    /// Returns [`MatrixError::UnknownDimension`] for the first declared
    /// dimension that is not registered.
    pub fn validate(&self, registry: &DimensionRegistry) -> Result<(), MatrixError> {
        match self.references.iter().find(|d| !registry.contains(d)) {
            Some(dimension) => Err(registry.unknown(dimension)),
            None => Ok(()),
        }
    }

    /// Evaluate the predicate
    ///
    /// # Errors
    /// Propagates whatever the predicate returns.
    #[inline]
    pub fn accepts(&self, combination: &Combination) -> Result<bool, MatrixError> {
        (self.predicate)(combination)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("label", &self.label)
            .field("references", &self.references)
            .finish_non_exhaustive()
    }
}

/// Whether every filter keeps the combination
///
/// Every filter runs on every combination, so an error in a later filter is
/// not hidden by an earlier one rejecting the tuple.
pub(crate) fn accepts_all(filters: &[Filter], combination: &Combination) -> Result<bool, MatrixError> {
    let mut keep = true;
    for filter in filters {
        keep &= filter.accepts(combination)?;
    }
    Ok(keep)
}

/// Check the declared dimensions of every filter
pub(crate) fn validate_all(filters: &[Filter], registry: &DimensionRegistry) -> Result<(), MatrixError> {
    filters.iter().try_for_each(|filter| filter.validate(registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn combination(pairs: &[(&str, &str)]) -> Combination {
        let names: Arc<[String]> = pairs.iter().map(|(d, _)| (*d).to_string()).collect();
        Combination::new(names, pairs.iter().map(|(_, v)| (*v).to_string()).collect())
    }

    #[test]
    fn exclude_declares_its_dimensions() {
        let filter = Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")]);
        assert_eq!(filter.references(), ["CommonsLang".to_string(), "Java".to_string()]);
    }

    #[test]
    fn exclude_reads_every_pair_even_after_a_mismatch() {
        let filter = Filter::exclude([("CommonsLang", "9.9"), ("Scala", "2.13")]);
        let err = filter
            .accepts(&combination(&[("CommonsLang", "3.0")]))
            .unwrap_err();
        assert!(matches!(err, MatrixError::UnknownDimension { ref dimension, .. } if dimension == "Scala"));
    }

    #[test]
    fn validate_reports_undeclared_registry_names() {
        let mut registry = DimensionRegistry::new();
        registry.register("Java", ["8"]).unwrap();
        let filter = Filter::new(|_| Ok(true)).referencing(["Java", "Kotlin"]);
        let err = filter.validate(&registry).unwrap_err();
        assert!(matches!(err, MatrixError::UnknownDimension { ref dimension, .. } if dimension == "Kotlin"));
    }

    #[test]
    fn later_filter_runs_after_a_rejecting_one() {
        let filters = [
            Filter::new(|_| Ok(false)),
            Filter::new(|c| Ok(c.version("Kotlin")? != "1.9")),
        ];
        let err = accepts_all(&filters, &combination(&[("Java", "8")])).unwrap_err();
        assert!(matches!(err, MatrixError::UnknownDimension { ref dimension, .. } if dimension == "Kotlin"));
    }
}
