//! Worker lifecycle states.

use std::fmt;

/// Where the worker is in its install/activate cycle.
///
/// `Installed` and `Active` carry the cache name they were reached with.
/// The transitional states carry the cache that keeps serving fetches while
/// they run, which is only set when an active worker re-installs or
/// re-activates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninstalled,
    Installing { serving: Option<String> },
    Installed(String),
    Activating { serving: Option<String> },
    Active(String),
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Uninstalled => "uninstalled",
            LifecycleState::Installing { .. } => "installing",
            LifecycleState::Installed(_) => "installed",
            LifecycleState::Activating { .. } => "activating",
            LifecycleState::Active(_) => "active",
        }
    }

    /// Name of the cache this state serves from, if it intercepts fetches.
    pub fn controlling_cache(&self) -> Option<&str> {
        match self {
            LifecycleState::Active(name) => Some(name),
            LifecycleState::Installing { serving } | LifecycleState::Activating { serving } => serving.as_deref(),
            _ => None,
        }
    }

    /// True while an install or activation is running.
    pub fn is_transitioning(&self) -> bool {
        matches!(self, LifecycleState::Installing { .. } | LifecycleState::Activating { .. })
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Installed(name) | LifecycleState::Active(name) => write!(f, "{}({})", self.as_str(), name),
            _ => f.write_str(self.as_str()),
        }
    }
}
