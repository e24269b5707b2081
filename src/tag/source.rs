//! Tag source traits for querying commits and tags of a repository

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, Utc};

use crate::tag::error::SourceError;
use crate::tag::types::Tag;

/// Trait for querying a repository's commit dates and tags
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TagSource: Send + Sync {
    /// Fetches the commit date of a commit
    ///
    /// # Returns
    /// * `Ok(Some(date))` - Committer date of the commit
    /// * `Ok(None)` - The commit exists but carries no date
    /// * `Err(SourceError::NotFound)` - The commit does not exist
    async fn commit_date(&self, commit: &str) -> Result<Option<DateTime<Utc>>, SourceError>;

    /// Fetches a snapshot of the repository's tags, ordered from newest to oldest
    async fn tags(&self) -> Result<Box<dyn TagList>, SourceError>;
}

/// Positional view of a tag collection taken at one point in time
///
/// Ordering is expected newest-first but is not enforced; the upstream list may
/// grow while a snapshot is being read.
#[async_trait::async_trait]
pub trait TagList: Send {
    /// Number of tags known when the snapshot was taken
    fn count(&self) -> usize;

    /// Returns the tag at `index`, counted from the newest tag
    async fn tag_at(&mut self, index: usize) -> Result<Tag, SourceError>;
}

#[async_trait::async_trait]
impl TagList for Vec<Tag> {
    fn count(&self) -> usize {
        self.len()
    }

    async fn tag_at(&mut self, index: usize) -> Result<Tag, SourceError> {
        self.as_slice()
            .get(index)
            .cloned()
            .ok_or(SourceError::MissingTag {
                index,
                count: self.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[tokio::test]
    async fn vec_tag_list_returns_tags_by_position() {
        let date = Utc.with_ymd_and_hms(2021, 3, 28, 22, 48, 16).unwrap();
        let mut tags: Vec<Tag> = vec![Tag::new("v5.12", date)];

        assert_eq!(TagList::count(&tags), 1);
        assert_eq!(tags.tag_at(0).await.unwrap(), Tag::new("v5.12", date));
    }

    #[tokio::test]
    async fn vec_tag_list_reports_missing_index() {
        let mut tags: Vec<Tag> = Vec::new();

        let result = tags.tag_at(3).await;

        assert!(matches!(
            result,
            Err(SourceError::MissingTag { index: 3, count: 0 })
        ));
    }
}
