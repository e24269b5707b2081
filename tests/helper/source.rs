//! Tag source test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use commit_to_tag::tag::error::SourceError;
use commit_to_tag::tag::source::{TagList, TagSource};
use commit_to_tag::tag::types::Tag;

/// Parses an RFC 3339 timestamp as returned by the GitHub API
pub fn date(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}

#[derive(Deserialize)]
struct FixtureTag {
    name: String,
    date: DateTime<Utc>,
}

/// Linux kernel tags from v5.12-rc6 down to v5.3-rc1, newest first
pub fn linux_tags() -> Vec<Tag> {
    let fixture: Vec<FixtureTag> =
        serde_json::from_str(include_str!("../fixtures/linux_tags.json")).unwrap();
    fixture
        .into_iter()
        .map(|tag| Tag::new(tag.name, tag.date))
        .collect()
}

/// In-memory tag source for testing
pub struct FixtureTagSource {
    commits: HashMap<String, Option<DateTime<Utc>>>,
    tags: Vec<Tag>,
    tag_fetches: Arc<AtomicUsize>,
}

impl FixtureTagSource {
    pub fn new(tags: Vec<Tag>) -> Self {
        Self {
            commits: HashMap::new(),
            tags,
            tag_fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_commit(mut self, commit: &str, date: Option<DateTime<Utc>>) -> Self {
        self.commits.insert(commit.to_string(), date);
        self
    }

    /// Counter of `tags()` calls, readable after the source is moved into a resolver
    pub fn tag_fetches(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.tag_fetches)
    }
}

#[async_trait]
impl TagSource for FixtureTagSource {
    async fn commit_date(&self, commit: &str) -> Result<Option<DateTime<Utc>>, SourceError> {
        match self.commits.get(commit) {
            Some(date) => Ok(*date),
            None => Err(SourceError::NotFound(format!("commit {}", commit))),
        }
    }

    async fn tags(&self) -> Result<Box<dyn TagList>, SourceError> {
        self.tag_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.tags.clone()))
    }
}
