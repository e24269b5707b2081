use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use commit_to_tag::config::Config;
use commit_to_tag::logging;
use commit_to_tag::tag::error::ResolveError;
use commit_to_tag::tag::resolver::TagResolver;
use commit_to_tag::tag::sources::GitHubTagSource;

#[derive(Parser)]
#[command(name = "commit-to-tag")]
#[command(version, about = "Find the earliest release tag which contains a commit")]
struct Cli {
    /// GitHub API access token
    #[arg(short = 'a', long, env = "GITHUB_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Commit to find the tag it first appeared in
    #[arg(short, long)]
    commit: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Repository to search, as owner/name
    #[arg(short, long)]
    repository: Option<String>,

    /// GitHub API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Substring marking a tag as pre-release
    #[arg(long)]
    prerelease_marker: Option<String>,

    /// Regular expression marking a tag as pre-release (overrides the marker)
    #[arg(long)]
    prerelease_pattern: Option<String>,

    /// Give up after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Command line flags override the config file
    fn apply(&self, config: &mut Config) {
        if let Some(repository) = &self.repository {
            config.github.repository = repository.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.github.base_url = base_url.clone();
        }
        if let Some(marker) = &self.prerelease_marker {
            config.prerelease.marker = marker.clone();
        }
        if let Some(pattern) = &self.prerelease_pattern {
            config.prerelease.pattern = Some(pattern.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.debug);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(token) = cli.api_token.as_deref() else {
        error!("Please provide a Github API token");
        return Ok(ExitCode::from(1));
    };

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::from(1));
        }
    };
    cli.apply(&mut config);

    let classifier = match config.prerelease.classifier() {
        Ok(classifier) => classifier,
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let source = match GitHubTagSource::new(
        &config.github.base_url,
        &config.github.repository,
        Some(token),
    ) {
        Ok(source) => source.with_per_page(config.github.per_page),
        Err(e) => {
            error!("{}", e);
            return Ok(ExitCode::from(ResolveError::from(e).exit_code()));
        }
    };
    let resolver = TagResolver::new(source, classifier);

    let timeout = Duration::from_secs(config.timeout_secs);
    let outcome = tokio::time::timeout(timeout, resolver.resolve(&cli.commit))
        .await
        .unwrap_or(Err(ResolveError::Timeout(config.timeout_secs)));

    match outcome {
        Ok(resolution) => {
            info!("Earliest tag which has {} is {}", cli.commit, resolution);
            println!("{}", resolution);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("{}", e);
            Ok(ExitCode::from(e.exit_code()))
        }
    }
}
