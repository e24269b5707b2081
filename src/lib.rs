//! Find the earliest release tag of a repository that contains a given commit.
//!
//! The [`tag`] module holds the resolution logic and the tag sources it queries;
//! [`config`] and [`logging`] carry the ambient setup used by the binary.

pub mod config;
pub mod logging;
pub mod tag;
