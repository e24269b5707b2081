//! GitHub REST API tag source implementation

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LINK};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::tag::error::SourceError;
use crate::tag::source::{TagList, TagSource};
use crate::tag::types::Tag;

/// Default base URL for GitHub API
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Repository queried when none is configured
pub const DEFAULT_REPOSITORY: &str = "torvalds/linux";

/// Largest page size accepted by the GitHub API
pub const MAX_PER_PAGE: usize = 100;

/// Page number inside a `Link` header URL
static PAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").unwrap());

/// Response from GitHub Commits API
#[derive(Debug, Deserialize)]
struct CommitResponse {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
struct GitActor {
    date: Option<DateTime<Utc>>,
}

/// Entry of the GitHub Tags API; carries no date of its own
#[derive(Debug, Clone, Deserialize)]
struct TagEntry {
    name: String,
    commit: TagCommit,
}

#[derive(Debug, Clone, Deserialize)]
struct TagCommit {
    sha: String,
}

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Request plumbing shared by the source and the tag lists it hands out
#[derive(Clone)]
struct GitHubApi {
    client: reqwest::Client,
    base_url: String,
    repository: String,
}

impl GitHubApi {
    async fn get(&self, url: &str, what: &str) -> Result<reqwest::Response, SourceError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        check_status(response, what).await
    }

    async fn commit_date(&self, commit: &str) -> Result<Option<DateTime<Utc>>, SourceError> {
        let url = format!("{}/repos/{}/commits/{}", self.base_url, self.repository, commit);
        let response = self.get(&url, &format!("commit {}", commit)).await?;
        let details: CommitResponse = parse_json(response).await?;

        Ok(details.commit.committer.and_then(|c| c.date))
    }

    fn tags_url(&self, page: usize, per_page: usize) -> String {
        format!(
            "{}/repos/{}/tags?per_page={}&page={}",
            self.base_url, self.repository, per_page, page
        )
    }

    async fn tags_page(&self, page: usize, per_page: usize) -> Result<Vec<TagEntry>, SourceError> {
        let response = self
            .get(&self.tags_url(page, per_page), &format!("tags of {}", self.repository))
            .await?;
        parse_json(response).await
    }
}

/// Tag source backed by the GitHub REST API
pub struct GitHubTagSource {
    api: GitHubApi,
    per_page: usize,
}

impl GitHubTagSource {
    /// Creates a source for `repository` ("owner/name") served from `base_url`
    pub fn new(base_url: &str, repository: &str, token: Option<&str>) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| SourceError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent("commit-to-tag")
            .default_headers(headers)
            .build()?;

        Ok(Self {
            api: GitHubApi {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                repository: repository.to_string(),
            },
            per_page: MAX_PER_PAGE,
        })
    }

    /// Sets the page size used when listing tags, capped at [`MAX_PER_PAGE`]
    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }
}

#[async_trait::async_trait]
impl TagSource for GitHubTagSource {
    async fn commit_date(&self, commit: &str) -> Result<Option<DateTime<Utc>>, SourceError> {
        self.api.commit_date(commit).await
    }

    async fn tags(&self) -> Result<Box<dyn TagList>, SourceError> {
        let response = self
            .api
            .get(
                &self.api.tags_url(1, self.per_page),
                &format!("tags of {}", self.api.repository),
            )
            .await?;
        let last = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(last_page)
            .unwrap_or(1);
        let first: Vec<TagEntry> = parse_json(response).await?;

        let mut pages = HashMap::new();
        let count = if last > 1 {
            // Only the last page's length is unknown
            let tail = self.api.tags_page(last, self.per_page).await?;
            let count = (last - 1) * self.per_page + tail.len();
            pages.insert(last, tail);
            count
        } else {
            first.len()
        };
        pages.insert(1, first);

        info!("{} has {} tags", self.api.repository, count);

        Ok(Box::new(GitHubTagList {
            api: self.api.clone(),
            per_page: self.per_page,
            count,
            pages,
            dates: HashMap::new(),
        }))
    }
}

/// Lazily paginated tag list; pages and commit dates are fetched on first access
pub struct GitHubTagList {
    api: GitHubApi,
    per_page: usize,
    count: usize,
    pages: HashMap<usize, Vec<TagEntry>>,
    dates: HashMap<String, DateTime<Utc>>,
}

#[async_trait::async_trait]
impl TagList for GitHubTagList {
    fn count(&self) -> usize {
        self.count
    }

    async fn tag_at(&mut self, index: usize) -> Result<Tag, SourceError> {
        let missing = SourceError::MissingTag {
            index,
            count: self.count,
        };
        if index >= self.count {
            return Err(missing);
        }

        let page = index / self.per_page + 1;
        if !self.pages.contains_key(&page) {
            let entries = self.api.tags_page(page, self.per_page).await?;
            self.pages.insert(page, entries);
        }

        // The upstream list may have shrunk since the count was taken
        let Some(entry) = self
            .pages
            .get(&page)
            .and_then(|entries| entries.get(index % self.per_page))
            .cloned()
        else {
            return Err(missing);
        };

        let date = match self.dates.get(&entry.commit.sha) {
            Some(date) => *date,
            None => {
                let date = self.api.commit_date(&entry.commit.sha).await?.ok_or_else(|| {
                    SourceError::InvalidResponse(format!("Tag {} has no commit date", entry.name))
                })?;
                self.dates.insert(entry.commit.sha.clone(), date);
                date
            }
        };

        Ok(Tag::new(entry.name, date))
    }
}

async fn check_status(
    response: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, SourceError> {
    let status = response.status();

    // GitHub answers 422 for a malformed or unknown commit sha
    if status == reqwest::StatusCode::NOT_FOUND
        || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
    {
        return Err(SourceError::NotFound(what.to_string()));
    }

    let rate_limit_exhausted = status == reqwest::StatusCode::FORBIDDEN
        && response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || rate_limit_exhausted {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(SourceError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("GitHub API returned status {} for {}", status, what);
        let message = match response.json::<ApiMessage>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        return Err(SourceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(response)
}

async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SourceError> {
    response.json().await.map_err(|e| {
        warn!("Failed to parse GitHub response: {}", e);
        SourceError::InvalidResponse(e.to_string())
    })
}

/// Extracts the page number of the `rel="last"` entry of a `Link` header
fn last_page(link: &str) -> Option<usize> {
    link.split(',')
        .find(|part| part.contains(r#"rel="last""#))
        .and_then(|part| PAGE_RE.captures(part))
        .and_then(|caps| caps[1].parse().ok())
}
