//! Tag resolution layer
//!
//! This module maps a commit to the earliest release tag that contains it by
//! searching a newest-first tag list on the tag dates.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  TagSource  │────▶│   TagList   │◀────│ TagResolver │
//! │ (commit,    │     │ (positional │     │  (search)   │
//! │  tags)      │     │  snapshot)  │     └─────────────┘
//! └─────────────┘     └─────────────┘            │
//!        │                                       ▼
//!        ▼                                ┌─────────────┐
//! ┌─────────────┐                         │ Prerelease  │
//! │   Sources   │                         │ Classifier  │
//! │  (github)   │                         └─────────────┘
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`source`]: `TagSource` and `TagList` traits for the remote collaborator
//! - [`sources`]: Concrete tag sources (GitHub REST API)
//! - [`resolver`]: The date-based search over the tag list
//! - [`prerelease`]: Release vs pre-release classification of tag names
//! - [`error`]: Error types for tag sources and resolution
//! - [`types`]: `Tag` and `Resolution`

pub mod error;
pub mod prerelease;
pub mod resolver;
pub mod source;
pub mod sources;
pub mod types;
