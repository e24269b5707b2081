//! Common types for tag resolution

use std::fmt;

use chrono::{DateTime, Utc};

/// A named, dated marker in the repository history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Committer date of the tagged commit
    pub date: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Outcome of resolving a commit to a release tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Earliest release tag containing the commit
    Found(String),
    /// No release tag could be determined
    Unknown,
    /// The commit is newer than every known tag
    Unmerged,
}

impl Resolution {
    /// Returns the tag name if a release tag was found
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Resolution::Found(name) => Some(name),
            Resolution::Unknown | Resolution::Unmerged => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Found(name) => f.write_str(name),
            Resolution::Unknown => f.write_str("Unknown"),
            Resolution::Unmerged => f.write_str("Unmerged"),
        }
    }
}
