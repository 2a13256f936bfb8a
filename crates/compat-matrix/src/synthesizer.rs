//! Execution unit synthesis
//!
//! [`TestMatrix`] is the declaration side: dimensions, filters, property
//! bindings and per-unit callbacks. [`TestMatrix::generate`] is a pure
//! function of that declaration which returns a complete [`MatrixPlan`] or
//! an error; there is no partially built plan.
//!
//! # Example
//!
//! ```rust
//! use compat_matrix::{Filter, TestMatrix};
//!
//! let mut matrix = TestMatrix::default();
//! matrix.register_dimension("CommonsLang", ["3.0", "3.5", "3.10"]).unwrap();
//! matrix.register_dimension("Java", ["8", "11", "17"]).unwrap();
//! matrix.filter(Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")]));
//! matrix.each_unit(|unit| {
//!     let lang = unit.version("CommonsLang")?;
//!     unit.add_constraint_notation(&format!("org.apache.commons:commons-lang3:{lang}!!"))?;
//!     Ok(())
//! });
//!
//! let plan = matrix.generate().unwrap();
//! assert_eq!(plan.len(), 8);
//! ```

use crate::combination::Combination;
use crate::config::MatrixConfig;
use crate::dimension::DimensionRegistry;
use crate::error::MatrixError;
use crate::filter::Filter;
use crate::generator::CombinationGenerator;
use crate::naming::{NameResolver, UnitId};
use crate::unit::{ExecutionUnit, UnitConfigurator};
use compat_model::{ident, BoxError, LifecycleUnit};
use serde::Serialize;
use std::fmt;

/// Per-unit configuration callback
pub type UnitCallback = dyn Fn(&mut UnitConfigurator<'_>) -> Result<(), BoxError>;

/// Declaration of one compatibility test matrix
pub struct TestMatrix {
    config: MatrixConfig,
    dimensions: DimensionRegistry,
    filters: Vec<Filter>,
    callbacks: Vec<Box<UnitCallback>>,
    property_bindings: Vec<(String, String)>,
}

impl TestMatrix {
    /// Create empty matrix
    #[must_use]
    pub fn new(config: MatrixConfig) -> Self {
        Self {
            config,
            dimensions: DimensionRegistry::new(),
            filters: Vec::new(),
            callbacks: Vec::new(),
            property_bindings: Vec::new(),
        }
    }

    /// Matrix configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    /// Registered dimensions
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &DimensionRegistry {
        &self.dimensions
    }

    /// Mutable access for registering dimensions
    #[inline]
    pub fn dimensions_mut(&mut self) -> &mut DimensionRegistry {
        &mut self.dimensions
    }

    /// Shorthand for `dimensions_mut().register(..)`
    ///
    /// # Errors
    /// See [`DimensionRegistry::register`].
    pub fn register_dimension<I, V>(
        &mut self,
        name: impl Into<String>,
        versions: I,
    ) -> Result<(), MatrixError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.dimensions.register(name, versions)
    }

    /// Add a filter; combinations must pass every filter to survive
    pub fn filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Add a configuration callback, run once per unit in registration order
    pub fn each_unit<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&mut UnitConfigurator<'_>) -> Result<(), BoxError> + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Bind a system property to a dimension's version in every unit
    pub fn bind_property(
        &mut self,
        dimension: impl Into<String>,
        property: impl Into<String>,
    ) -> &mut Self {
        self.property_bindings
            .push((dimension.into(), property.into()));
        self
    }

    /// Number of registered callbacks
    #[inline]
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Generate the complete plan
    ///
    /// # Errors
    /// - [`MatrixError::InvalidTestScope`] if the test scope is not a
    ///   host-safe identifier
    /// - [`MatrixError::UnknownDimension`] from a filter or property binding
    /// - [`MatrixError::FilterArity`] from a destructuring filter
    /// - [`MatrixError::EmptyMatrix`] when configured to fail on empty
    /// - [`MatrixError::IdentifierCollision`] when ids collide
    /// - [`MatrixError::Callback`] when any callback fails; generation stops
    ///   at the first failure
    pub fn generate(&self) -> Result<MatrixPlan, MatrixError> {
        if !ident::is_host_safe(&self.config.test_scope) {
            return Err(MatrixError::InvalidTestScope {
                test_scope: self.config.test_scope.clone(),
            });
        }
        for (dimension, _) in &self.property_bindings {
            if !self.dimensions.contains(dimension) {
                return Err(self.dimensions.unknown(dimension));
            }
        }

        let enumeration = CombinationGenerator::new(&self.dimensions)
            .with_filters(&self.filters)
            .fail_on_empty_matrix(self.config.fail_on_empty_matrix)
            .run()?;

        let resolver = NameResolver::new(self.config.test_scope.as_str());
        let ids = resolver.resolve_all(&enumeration.combinations)?;

        let mut units = Vec::with_capacity(ids.len());
        for (id, combination) in ids.iter().zip(&enumeration.combinations) {
            units.push(self.synthesize(&resolver, id, combination)?);
        }

        let lifecycle = LifecycleUnit::new(
            self.config.lifecycle_unit.as_str(),
            format!(
                "Runs the {} test suite against every compatibility combination.",
                self.config.test_scope
            ),
            self.config.group.as_str(),
        )
        .depending_on(units.iter().map(|u| u.id().to_string()));

        let disabled = units.iter().filter(|u| !u.is_enabled()).count();
        tracing::info!(
            "Generated {} compatibility units from {} combinations ({} disabled)",
            units.len(),
            enumeration.enumerated,
            disabled
        );

        Ok(MatrixPlan {
            units,
            lifecycle,
            enumerated: enumeration.enumerated,
        })
    }

    fn synthesize(
        &self,
        resolver: &NameResolver,
        id: &UnitId,
        combination: &Combination,
    ) -> Result<ExecutionUnit, MatrixError> {
        let mut configurator = UnitConfigurator::new(
            id,
            combination,
            resolver.describe(combination),
            &self.config.test_scope,
        );

        for (dimension, property) in &self.property_bindings {
            let version = combination.version(dimension)?;
            configurator.set_system_property(property.as_str(), version);
        }

        for (index, callback) in self.callbacks.iter().enumerate() {
            callback(&mut configurator).map_err(|source| MatrixError::Callback {
                unit: id.to_string(),
                combination: combination.to_string(),
                callback: index,
                source,
            })?;
        }

        tracing::debug!(
            "Configured unit {} for {} (enabled: {})",
            id,
            combination,
            configurator.is_enabled()
        );
        Ok(configurator.finish(&self.config.group))
    }
}

impl Default for TestMatrix {
    fn default() -> Self {
        Self::new(MatrixConfig::default())
    }
}

impl fmt::Debug for TestMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestMatrix")
            .field("config", &self.config)
            .field("dimensions", &self.dimensions)
            .field("filters", &self.filters)
            .field("callbacks", &self.callbacks.len())
            .field("property_bindings", &self.property_bindings)
            .finish()
    }
}

/// Result of one generation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixPlan {
    units: Vec<ExecutionUnit>,
    lifecycle: LifecycleUnit,
    enumerated: usize,
}

impl MatrixPlan {
    /// Units in generation order, disabled ones included
    #[inline]
    #[must_use]
    pub fn units(&self) -> &[ExecutionUnit] {
        &self.units
    }

    /// Units the host should actually run
    pub fn runnable(&self) -> impl Iterator<Item = &ExecutionUnit> + '_ {
        self.units.iter().filter(|u| u.is_enabled())
    }

    /// Unit ids in generation order
    pub fn ids(&self) -> impl Iterator<Item = &UnitId> + '_ {
        self.units.iter().map(ExecutionUnit::id)
    }

    /// Look up a unit by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ExecutionUnit> {
        self.units.iter().find(|u| u.id().as_str() == id)
    }

    /// Aggregate unit depending on every matrix unit
    #[inline]
    #[must_use]
    pub fn lifecycle(&self) -> &LifecycleUnit {
        &self.lifecycle
    }

    /// Combinations enumerated before filtering
    #[inline]
    #[must_use]
    pub fn enumerated(&self) -> usize {
        self.enumerated
    }

    /// Number of units
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the plan has no units
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compat_model::Visibility;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn lang_by_java() -> TestMatrix {
        let mut matrix = TestMatrix::default();
        matrix
            .register_dimension("CommonsLang", ["3.0", "3.5", "3.10"])
            .unwrap();
        matrix.register_dimension("Java", ["8", "11", "17"]).unwrap();
        matrix
    }

    #[test]
    fn callbacks_see_their_own_tuple_once() {
        let mut matrix = lang_by_java();
        matrix.filter(Filter::exclude([("CommonsLang", "3.0"), ("Java", "17")]));
        let seen: Rc<RefCell<Vec<(String, String)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        matrix.each_unit(move |unit| {
            let [lang, java] = unit.destructure::<2>()?;
            sink.borrow_mut().push((lang.to_string(), java.to_string()));
            Ok(())
        });

        let plan = matrix.generate().unwrap();
        assert_eq!(plan.len(), 8);
        assert_eq!(plan.enumerated(), 9);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 8);
        for (unit, (lang, java)) in plan.units().iter().zip(seen.iter()) {
            assert_eq!(unit.combination().version("CommonsLang").unwrap(), lang);
            assert_eq!(unit.combination().version("Java").unwrap(), java);
        }
        assert!(!seen.contains(&("3.0".to_string(), "17".to_string())));
    }

    #[test]
    fn constraints_stay_in_their_unit() {
        let mut matrix = lang_by_java();
        matrix.each_unit(|unit| {
            let lang = unit.version("CommonsLang")?;
            unit.add_constraint_notation(&format!("org.apache.commons:commons-lang3:{lang}!!"))?;
            Ok(())
        });

        let plan = matrix.generate().unwrap();
        for unit in plan.units() {
            let pins: Vec<_> = unit.constraints().collect();
            assert_eq!(pins.len(), 1);
            assert_eq!(
                pins[0].version(),
                unit.combination().version("CommonsLang").unwrap()
            );
            let scope = unit.runtime_only_scope();
            assert!(!scope.is_resolvable());
            assert!(scope
                .constraints()
                .iter()
                .all(|c| c.visibility == Visibility::RuntimeOnly));
            assert_eq!(
                scope.name().as_str(),
                format!("{}RuntimeOnly", unit.id())
            );
            assert_eq!(unit.classpath_scope().extends(), &[scope.name().clone()]);
        }
    }

    #[test]
    fn disabled_units_keep_their_id() {
        let mut matrix = lang_by_java();
        matrix.each_unit(|unit| {
            if unit.version("Java")? == "8" {
                unit.disable();
            }
            Ok(())
        });

        let plan = matrix.generate().unwrap();
        assert_eq!(plan.len(), 9);
        assert_eq!(plan.runnable().count(), 6);
        assert!(plan.get("testCompatibilityWithCommonsLang3_0AndJava8").is_some());
        assert_eq!(plan.lifecycle().depends_on.len(), 9);
    }

    #[test]
    fn failing_callback_aborts_with_tuple() {
        let mut matrix = lang_by_java();
        matrix.each_unit(|_| Ok(()));
        matrix.each_unit(|unit| {
            if unit.version("CommonsLang")? == "3.5" {
                return Err("unsupported".into());
            }
            Ok(())
        });

        let err = matrix.generate().unwrap_err();
        match err {
            MatrixError::Callback {
                unit,
                combination,
                callback,
                ..
            } => {
                assert_eq!(unit, "testCompatibilityWithCommonsLang3_5AndJava8");
                assert_eq!(combination, "(CommonsLang=3.5, Java=8)");
                assert_eq!(callback, 1);
            }
            other => panic!("expected callback error, got {other:?}"),
        }
    }

    #[test]
    fn property_binding_sets_version() {
        let mut matrix = lang_by_java();
        matrix.bind_property("Java", "java.version.under.test");
        let plan = matrix.generate().unwrap();
        let unit = plan.get("testCompatibilityWithCommonsLang3_10AndJava11").unwrap();
        assert_eq!(
            unit.system_properties().get("java.version.under.test").map(String::as_str),
            Some("11")
        );
    }

    #[test]
    fn property_binding_to_unknown_dimension_fails() {
        let mut matrix = lang_by_java();
        matrix.bind_property("Scala", "scala.version");
        assert!(matches!(
            matrix.generate(),
            Err(MatrixError::UnknownDimension { dimension, .. }) if dimension == "Scala"
        ));
    }

    #[test]
    fn callback_overrides_are_unit_local() {
        let mut matrix = lang_by_java();
        matrix.each_unit(|unit| {
            let java = unit.version("Java")?;
            let lang = unit.version("CommonsLang")?;
            unit.set_toolchain(java);
            unit.set_override("JAVA_TOOL_OPTIONS", format!("-Dlang={lang}"));
            unit.set_description(format!("Lang on Java {java}"));
            Ok(())
        });

        let plan = matrix.generate().unwrap();
        let unit = plan.get("testCompatibilityWithCommonsLang3_5AndJava17").unwrap();
        assert_eq!(unit.toolchain(), Some("17"));
        assert_eq!(unit.description(), "Lang on Java 17");
        assert_eq!(
            unit.overrides().get("JAVA_TOOL_OPTIONS").map(String::as_str),
            Some("-Dlang=3.5")
        );
    }

    #[test]
    fn empty_matrix_without_failure_flag_is_empty_plan() {
        let mut matrix = lang_by_java();
        matrix.filter(Filter::new(|_| Ok(false)));
        let plan = matrix.generate().unwrap();
        assert!(plan.is_empty());
        assert!(plan.lifecycle().depends_on.is_empty());
    }

    #[test]
    fn default_description_lists_dimensions() {
        let plan = lang_by_java().generate().unwrap();
        assert_eq!(
            plan.units()[0].description(),
            "Runs compatibility test with CommonsLang 3.0 and Java 8."
        );
        assert_eq!(plan.units()[0].group(), "verification");
    }

    #[test]
    fn test_scope_must_be_host_safe() {
        let mut matrix = TestMatrix::new(MatrixConfig::default().with_test_scope("functional test/x"));
        matrix.register_dimension("Java", ["8"]).unwrap();
        let err = matrix.generate().unwrap_err();
        assert!(matches!(
            err,
            MatrixError::InvalidTestScope { ref test_scope } if test_scope == "functional test/x"
        ));

        let mut matrix = TestMatrix::new(MatrixConfig::default().with_test_scope(""));
        matrix.register_dimension("Java", ["8"]).unwrap();
        assert!(matches!(matrix.generate(), Err(MatrixError::InvalidTestScope { .. })));
    }

    #[test]
    fn every_generated_id_is_host_safe() {
        let mut matrix = TestMatrix::new(MatrixConfig::default().with_test_scope("integration_test"));
        matrix.register_dimension("commons-lang", ["3.0-RC1", "3.10"]).unwrap();
        matrix.register_dimension("jdk.version", ["1.8", "17"]).unwrap();
        let plan = matrix.generate().unwrap();
        assert!(plan.ids().all(|id| ident::is_host_safe(id.as_str())));
    }
}
