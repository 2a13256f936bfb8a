//! Adapter scope lifecycle
//!
//! Every (namespace, version) scope moves `Declared -> Compiled -> Published`.
//! A failed compile leaves the scope `Declared`; there is no way back from
//! `Published`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of one adapter scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterState {
    /// Scope and pin declared, nothing compiled yet
    Declared,
    /// Sources compiled against the scope's own pin
    Compiled,
    /// Output bundled into the consumer artifact
    Published,
}

impl AdapterState {
    /// States reachable in one step
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [AdapterState] {
        match self {
            Self::Declared => &[Self::Compiled],
            Self::Compiled => &[Self::Published],
            Self::Published => &[],
        }
    }

    /// Whether `self -> to` is a legal step
    #[inline]
    #[must_use]
    pub fn can_transition_to(self, to: AdapterState) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Whether the state is final
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Declared => "declared",
            Self::Compiled => "compiled",
            Self::Published => "published",
        })
    }
}
