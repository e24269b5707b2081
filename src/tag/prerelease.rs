//! Release vs pre-release classification of tag names

use regex::Regex;

/// Marker found in pre-release tag names of the Linux kernel (`v5.10-rc7`)
pub const DEFAULT_PRERELEASE_MARKER: &str = "rc";

/// Decides whether a tag name denotes a pre-release
///
/// Matching is case-sensitive and applies to the whole tag name, so a marker
/// also catches compound suffixes such as `-rc1-dontuse`.
#[derive(Debug, Clone)]
pub enum PrereleaseClassifier {
    /// Pre-release iff the name contains the marker
    Substring(String),
    /// Pre-release iff the pattern matches anywhere in the name
    Pattern(Regex),
}

impl PrereleaseClassifier {
    /// Builds a classifier from a regular expression
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    pub fn is_prerelease(&self, tag_name: &str) -> bool {
        match self {
            PrereleaseClassifier::Substring(marker) => tag_name.contains(marker.as_str()),
            PrereleaseClassifier::Pattern(re) => re.is_match(tag_name),
        }
    }
}

impl Default for PrereleaseClassifier {
    fn default() -> Self {
        Self::Substring(DEFAULT_PRERELEASE_MARKER.to_string())
    }
}
