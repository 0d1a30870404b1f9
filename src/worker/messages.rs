//! Requests understood by the index worker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a build was requested.
///
/// Several requests arriving while a build runs collapse into one pending
/// build; the trigger kept for it is the strongest of them, which only
/// matters for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildTrigger {
    Timer,
    Startup,
    Explicit,
    SettingsChanged,
}

impl BuildTrigger {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Startup => "startup",
            Self::Explicit => "explicit",
            Self::SettingsChanged => "settings_changed",
        }
    }

    /// Folds a new request into an already pending one.
    #[must_use]
    pub fn merge(pending: Option<Self>, incoming: Self) -> Self {
        pending.map_or(incoming, |p| p.max(incoming))
    }
}

impl fmt::Display for BuildTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
