//! Shared helpers for integration tests

mod source;

pub use source::{FixtureTagSource, date, linux_tags};
