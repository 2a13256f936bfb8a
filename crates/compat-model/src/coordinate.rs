//! Dependency coordinates and version constraints
//!
//! A [`Coordinate`] names a dependency (`group:artifact`). A
//! [`DependencyConstraint`] pins a coordinate to a version; strict pins use
//! the `!!` suffix in notation form, so conflicting requirements surface
//! instead of silently resolving to the newest version.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const STRICT_SUFFIX: &str = "!!";

/// A dependency identity without a version
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    group: String,
    artifact: String,
}

impl Coordinate {
    /// Create coordinate from its parts
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidCoordinate`] if either part is empty or
    /// contains `:` or whitespace.
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Result<Self, ModelError> {
        let group = group.into();
        let artifact = artifact.into();
        if !is_valid_part(&group) || !is_valid_part(&artifact) {
            return Err(ModelError::InvalidCoordinate(format!("{group}:{artifact}")));
        }
        Ok(Self { group, artifact })
    }

    /// Group part
    #[inline]
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Artifact part
    #[inline]
    #[must_use]
    pub fn artifact(&self) -> &str {
        &self.artifact
    }
}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty() && !part.contains(':') && !part.chars().any(char::is_whitespace)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

impl FromStr for Coordinate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, artifact)) => {
                Self::new(group, artifact).map_err(|_| ModelError::InvalidCoordinate(s.to_string()))
            }
            None => Err(ModelError::InvalidCoordinate(s.to_string())),
        }
    }
}

impl TryFrom<String> for Coordinate {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(value: Coordinate) -> Self {
        value.to_string()
    }
}

/// A version pin on a coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyConstraint {
    coordinate: Coordinate,
    version: String,
    strict: bool,
}

impl DependencyConstraint {
    /// Create a strict pin: resolution fails rather than pick another version
    #[must_use]
    pub fn strict(coordinate: Coordinate, version: impl Into<String>) -> Self {
        Self {
            coordinate,
            version: version.into(),
            strict: true,
        }
    }

    /// Create a preferred version that the resolver may upgrade
    #[must_use]
    pub fn prefer(coordinate: Coordinate, version: impl Into<String>) -> Self {
        Self {
            coordinate,
            version: version.into(),
            strict: false,
        }
    }

    /// Pinned coordinate
    #[inline]
    #[must_use]
    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Pinned version
    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the pin is strict
    #[inline]
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Render as `group:artifact:version[!!]`
    #[must_use]
    pub fn notation(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DependencyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinate, self.version)?;
        if self.strict {
            f.write_str(STRICT_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for DependencyConstraint {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidConstraint(s.to_string());

        let (body, strict) = match s.strip_suffix(STRICT_SUFFIX) {
            Some(body) => (body, true),
            None => (s, false),
        };
        let (coordinate, version) = body.rsplit_once(':').ok_or_else(invalid)?;
        if version.is_empty() || version.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let coordinate: Coordinate = coordinate.parse().map_err(|_| invalid())?;

        Ok(Self {
            coordinate,
            version: version.to_string(),
            strict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang3() -> Coordinate {
        Coordinate::new("org.apache.commons", "commons-lang3").unwrap()
    }

    #[test]
    fn coordinate_parse_and_display() {
        let coordinate: Coordinate = "org.apache.commons:commons-lang3".parse().unwrap();
        assert_eq!(coordinate.group(), "org.apache.commons");
        assert_eq!(coordinate.artifact(), "commons-lang3");
        assert_eq!(coordinate.to_string(), "org.apache.commons:commons-lang3");
    }

    #[test]
    fn coordinate_rejects_bad_notation() {
        assert!("no-colon".parse::<Coordinate>().is_err());
        assert!(":artifact".parse::<Coordinate>().is_err());
        assert!("group:".parse::<Coordinate>().is_err());
        assert!("a:b:c".parse::<Coordinate>().is_err());
        assert!(Coordinate::new("with space", "x").is_err());
    }

    #[test]
    fn constraint_strict_notation() {
        let constraint: DependencyConstraint =
            "org.apache.commons:commons-lang3:3.10!!".parse().unwrap();
        assert!(constraint.is_strict());
        assert_eq!(constraint.version(), "3.10");
        assert_eq!(constraint.coordinate(), &lang3());
        assert_eq!(constraint.notation(), "org.apache.commons:commons-lang3:3.10!!");
    }

    #[test]
    fn constraint_preferred_notation() {
        let constraint: DependencyConstraint = "a:b:1.0".parse().unwrap();
        assert!(!constraint.is_strict());
        assert_eq!(constraint.to_string(), "a:b:1.0");
    }

    #[test]
    fn constraint_rejects_missing_version() {
        assert!("a:b".parse::<DependencyConstraint>().is_err());
        assert!("a:b:".parse::<DependencyConstraint>().is_err());
        assert!("a:b:!!".parse::<DependencyConstraint>().is_err());
        assert!("just-text".parse::<DependencyConstraint>().is_err());
    }

    #[test]
    fn constructors_set_strictness() {
        assert!(DependencyConstraint::strict(lang3(), "3.0").is_strict());
        assert!(!DependencyConstraint::prefer(lang3(), "3.0").is_strict());
    }

    #[test]
    fn coordinate_serializes_as_notation() {
        let json = serde_json::to_string(&lang3()).unwrap();
        assert_eq!(json, "\"org.apache.commons:commons-lang3\"");
        let back: Coordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lang3());
    }
}
