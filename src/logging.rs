//! Logging setup for the command line tool

use tracing_subscriber::EnvFilter;

/// Builds the log filter. `RUST_LOG` wins over the `--debug` switch.
pub fn env_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log {
        Some(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ if debug => EnvFilter::new("debug"),
        _ => EnvFilter::new("info"),
    }
}

/// Installs a stderr subscriber so stdout carries only the resolved tag
pub fn init(debug: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug, rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
