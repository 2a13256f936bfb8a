//! Declarative manifest
//!
//! A TOML description of a [`CompatibilityContext`] for hosts that cannot
//! run closures:
//!
//! ```toml
//! [settings]
//! test_scope = "test"
//!
//! [[dimension]]
//! name = "CommonsLang"
//! versions = ["3.0", "3.5", "3.10"]
//! property = "commons.lang.version"
//! coordinate = "org.apache.commons:commons-lang3"
//!
//! [[dimension]]
//! name = "Java"
//! versions = ["8", "11", "17"]
//! toolchain = true
//!
//! [[exclude]]
//! CommonsLang = "3.0"
//! Java = "17"
//!
//! [[namespace]]
//! name = "Lang"
//! versions = ["3.0", "3.10"]
//! coordinate = "org.apache.commons:commons-lang3"
//! ```
//!
//! Declarative fields are turned into the same filters, property bindings
//! and callbacks a programmatic caller would register.

use crate::config::CompatConfig;
use crate::context::CompatibilityContext;
use crate::error::{CompatError, ManifestError};
use compat_adapter::{AdapterConfig, Namespace};
use compat_matrix::{Filter, MatrixConfig};
use compat_model::{Coordinate, DependencyConstraint};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;

/// One `[[dimension]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionEntry {
    /// Dimension name
    pub name: String,
    /// Ordered versions
    pub versions: Vec<String>,
    /// System property bound to the version
    #[serde(default)]
    pub property: Option<String>,
    /// `group:artifact` pinned strictly to the version in every unit
    #[serde(default)]
    pub coordinate: Option<String>,
    /// Use the version as the unit's toolchain
    #[serde(default)]
    pub toolchain: bool,
}

/// One `[[namespace]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceEntry {
    /// Namespace name; may be empty
    #[serde(default)]
    pub name: String,
    /// Ordered versions
    pub versions: Vec<String>,
    /// `group:artifact` pinned compile-only per adapter
    #[serde(default)]
    pub coordinate: Option<String>,
    /// Scope receiving adapter outputs
    #[serde(default)]
    pub target_scope: Option<String>,
}

/// Parsed manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Matrix settings
    #[serde(default)]
    pub settings: MatrixConfig,
    /// Adapter settings
    #[serde(default)]
    pub adapters: AdapterConfig,
    /// Test dimensions in registration order
    #[serde(default)]
    pub dimension: Vec<DimensionEntry>,
    /// Excluded partial combinations
    #[serde(default)]
    pub exclude: Vec<IndexMap<String, String>>,
    /// Adapter namespaces
    #[serde(default)]
    pub namespace: Vec<NamespaceEntry>,
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Manifest {
    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns [`ManifestError::Io`] or [`ManifestError::Parse`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Configuration part of the manifest
    #[must_use]
    pub fn config(&self) -> CompatConfig {
        CompatConfig::new()
            .with_matrix(self.settings.clone())
            .with_adapters(self.adapters.clone())
    }

    /// Build the context this manifest describes
    ///
    /// # Errors
    /// - [`ManifestError::Coordinate`] for malformed coordinates
    /// - any dimension or namespace registration error
    pub fn into_context(self) -> Result<CompatibilityContext, CompatError> {
        let mut context = CompatibilityContext::new(self.config());

        for entry in self.dimension {
            let coordinate = parse_coordinate(entry.coordinate.as_deref(), &entry.name)?;
            let tests = context.tests_mut();
            tests.register_dimension(entry.name.as_str(), entry.versions)?;

            if let Some(property) = entry.property {
                tests.bind_property(entry.name.as_str(), property);
            }
            if let Some(coordinate) = coordinate {
                let dimension = entry.name.clone();
                tests.each_unit(move |unit| {
                    let version = unit.version(&dimension)?;
                    unit.add_constraint(DependencyConstraint::strict(coordinate.clone(), version))?;
                    Ok(())
                });
            }
            if entry.toolchain {
                let dimension = entry.name;
                tests.each_unit(move |unit| {
                    let version = unit.version(&dimension)?;
                    unit.set_toolchain(version);
                    Ok(())
                });
            }
        }

        for pairs in self.exclude {
            context.tests_mut().filter(Filter::exclude(pairs));
        }

        for entry in self.namespace {
            let mut namespace = Namespace::new(entry.name.as_str(), entry.versions);
            let label = format!("namespace '{}'", entry.name);
            if let Some(coordinate) = parse_coordinate(entry.coordinate.as_deref(), &label)? {
                namespace = namespace.pinning(coordinate);
            }
            if let Some(target) = entry.target_scope {
                namespace = namespace.exported_to(target);
            }
            context.adapters_mut().register_namespace(namespace)?;
        }

        Ok(context)
    }
}

fn parse_coordinate(raw: Option<&str>, entry: &str) -> Result<Option<Coordinate>, ManifestError> {
    raw.map(|raw| {
        raw.parse().map_err(|source| ManifestError::Coordinate {
            entry: entry.to_string(),
            source,
        })
    })
    .transpose()
}
