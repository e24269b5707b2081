//! Tag source implementations

pub mod github;

pub use github::GitHubTagSource;
