//! Run mode and ordering definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a run collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Profiles first, then the timeline (default).
    #[default]
    All,
    /// Only account profiles from the account list.
    Profiles,
    /// Only the authenticated home timeline.
    Timeline,
}

impl RunMode {
    pub fn includes_profiles(self) -> bool {
        matches!(self, RunMode::All | RunMode::Profiles)
    }

    pub fn includes_timeline(self) -> bool {
        matches!(self, RunMode::All | RunMode::Timeline)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::All => write!(f, "all"),
            RunMode::Profiles => write!(f, "profiles"),
            RunMode::Timeline => write!(f, "timeline"),
        }
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(RunMode::All),
            "profiles" => Ok(RunMode::Profiles),
            "timeline" => Ok(RunMode::Timeline),
            _ => Err(format!("Unknown run mode: {}", s)),
        }
    }
}

/// Ordering applied to post ids when the collection is re-sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdOrdering {
    /// Compare ids as plain strings. Only correct while all ids share a length.
    #[default]
    Lexicographic,
    /// Compare ids as arbitrary-length unsigned integers.
    Numeric,
}

impl fmt::Display for IdOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdOrdering::Lexicographic => write!(f, "lexicographic"),
            IdOrdering::Numeric => write!(f, "numeric"),
        }
    }
}
