//! Commit policy value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When a finished assistant answer is frozen into the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitPolicy {
    /// Commit as soon as the stream reports `done` (default)
    #[default]
    Eager,
    /// Commit on the next submission, just before the new user turn
    Lazy,
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitPolicy::Eager => write!(f, "eager"),
            CommitPolicy::Lazy => write!(f, "lazy"),
        }
    }
}

impl FromStr for CommitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eager" => Ok(CommitPolicy::Eager),
            "lazy" => Ok(CommitPolicy::Lazy),
            other => Err(format!("unknown commit policy '{other}'")),
        }
    }
}
