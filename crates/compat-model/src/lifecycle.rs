//! Lifecycle aggregates
//!
//! A lifecycle unit runs nothing itself; it depends on a set of runnable
//! units so the host can trigger all of them with one name.

use serde::{Deserialize, Serialize};

/// Aggregate unit depending on other units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleUnit {
    /// Unit name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Host grouping label
    pub group: String,
    /// Ids of the units this one triggers, in registration order
    pub depends_on: Vec<String>,
}

impl LifecycleUnit {
    /// Create lifecycle unit without dependencies
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            group: group.into(),
            depends_on: Vec::new(),
        }
    }

    /// Add dependencies
    #[must_use]
    pub fn depending_on<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on.extend(ids.into_iter().map(Into::into));
        self
    }
}
