#![forbid(unsafe_code)]

//! Canonical page lifecycle states.
//!
//! Declaration order carries no meaning. The only ordering between states is
//! the position they occupy inside a transition sequence (see
//! [`crate::transitions`]).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the six canonical page lifecycle states.
///
/// Serialized and displayed with the lowercase names used by the Page
/// Lifecycle API (`"active"`, `"hidden"`, ...).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Pre-sampling default. Never a transition source or target.
    #[default]
    Unknown,
    /// Visible and has input focus.
    Active,
    /// Visible without input focus.
    Passive,
    /// Not visible, not frozen or terminated.
    Hidden,
    /// Task queues suspended by the browser (freeze or back/forward cache).
    Frozen,
    /// Unloading. No outbound transitions exist.
    Terminated,
}

impl LifecycleState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Active,
        Self::Passive,
        Self::Hidden,
        Self::Frozen,
        Self::Terminated,
    ];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Active => "active",
            Self::Passive => "passive",
            Self::Hidden => "hidden",
            Self::Frozen => "frozen",
            Self::Terminated => "terminated",
        }
    }

    /// Whether the page can never leave this state without a fresh load.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateError {
    input: String,
}

impl ParseStateError {
    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown lifecycle state: {:?}", self.input)
    }
}

impl std::error::Error for ParseStateError {}

impl FromStr for LifecycleState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseStateError {
                input: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn names_parse_back() {
        for state in LifecycleState::ALL {
            assert_eq!(state.as_str().parse::<LifecycleState>(), Ok(state));
        }
    }

    #[test]
    fn parse_rejects_other_case_and_garbage() {
        let err = "Active".parse::<LifecycleState>().unwrap_err();
        assert_eq!(err.input(), "Active");
        assert!("".parse::<LifecycleState>().is_err());
        assert_eq!(
            "prerender".parse::<LifecycleState>().unwrap_err().to_string(),
            "unknown lifecycle state: \"prerender\""
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&LifecycleState::Terminated).unwrap();
        assert_eq!(json, "\"terminated\"");
        let back: LifecycleState = serde_json::from_str("\"frozen\"").unwrap();
        assert_eq!(back, LifecycleState::Frozen);
    }

    #[test]
    fn only_terminated_is_terminal() {
        let terminal: Vec<_> = LifecycleState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![LifecycleState::Terminated]);
        assert_eq!(LifecycleState::default(), LifecycleState::Unknown);
    }
}
