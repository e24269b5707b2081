//! Commit to release tag resolution
//!
//! Binary-searches a newest-first tag list for the oldest tag dated on or after
//! the commit, then steps back over pre-release tags to the nearest release.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::tag::error::{ResolveError, SourceError};
use crate::tag::prerelease::PrereleaseClassifier;
use crate::tag::source::{TagList, TagSource};
use crate::tag::types::Resolution;

/// Resolves commits to the earliest release tag that contains them
pub struct TagResolver<S> {
    source: S,
    classifier: PrereleaseClassifier,
}

impl<S: TagSource> TagResolver<S> {
    pub fn new(source: S, classifier: PrereleaseClassifier) -> Self {
        Self { source, classifier }
    }

    /// Resolve `commit` against a fresh snapshot of the source's tags
    ///
    /// A commit without a date is reported as [`ResolveError::CommitDateUnknown`];
    /// source failures are propagated unchanged.
    pub async fn resolve(&self, commit: &str) -> Result<Resolution, ResolveError> {
        let commit_date = self.source.commit_date(commit).await?;
        debug!("Commit Date is {:?}", commit_date);
        let Some(commit_date) = commit_date else {
            return Err(ResolveError::CommitDateUnknown(commit.to_string()));
        };

        let mut tags = self.source.tags().await?;
        Ok(find_release_tag(tags.as_mut(), commit_date, &self.classifier).await?)
    }
}

/// Find the earliest release tag in `tags` dated on or after `commit_date`
///
/// `tags` is assumed to be ordered by decreasing date. Ordering is not
/// re-validated, so a list mutated out of order yields an approximate result.
pub async fn find_release_tag(
    tags: &mut dyn TagList,
    commit_date: DateTime<Utc>,
    classifier: &PrereleaseClassifier,
) -> Result<Resolution, SourceError> {
    let count = tags.count();
    if count == 0 {
        debug!("No tags to search");
        return Ok(Resolution::Unknown);
    }

    // start: newer-or-equal (or list head), end: strictly older (or list end)
    let mut start = 0;
    let mut end = count;
    let mut idx = (start + end) / 2;
    while idx != 0 && end - start != 1 {
        let tag = tags.tag_at(idx).await?;
        debug!("Checking {}: {}, {}", idx, tag.name, tag.date);
        if tag.date >= commit_date {
            start = idx;
        } else {
            end = idx;
        }
        idx = (start + end) / 2;
    }

    // start < end always holds here, so the scan visits at least one tag
    let mut found = false;
    let mut tag = tags.tag_at(start).await?;
    idx = start;
    let mut scanned_date = tag.date;
    for i in start..end {
        if i != start {
            tag = tags.tag_at(i).await?;
        }
        idx = i;
        scanned_date = tag.date;
        if tag.date >= commit_date {
            found = true;
            break;
        }
    }

    while classifier.is_prerelease(&tag.name) {
        let Some(prev) = idx.checked_sub(1) else {
            debug!("No release tag at or before {}", tag.name);
            return Ok(Resolution::Unknown);
        };
        idx = prev;
        tag = tags.tag_at(idx).await?;
    }

    if !found && idx == start && scanned_date < commit_date {
        return Ok(Resolution::Unmerged);
    }

    Ok(Resolution::Found(tag.name))
}
