use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid API token")]
    InvalidToken,

    #[error("Tag {index} missing from a list of {count} tags")]
    MissingTag { index: usize, count: usize },
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Failed to query commit date of {0}")]
    CommitDateUnknown(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Resolution timed out after {0} seconds")]
    Timeout(u64),
}

impl ResolveError {
    /// Process exit code reported by the command line tool
    pub fn exit_code(&self) -> u8 {
        match self {
            ResolveError::CommitDateUnknown(_) => 1,
            ResolveError::Source(_) | ResolveError::Timeout(_) => 2,
        }
    }
}
