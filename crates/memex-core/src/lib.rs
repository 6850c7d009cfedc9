//! # memex-core
//!
//! Core types, traits, and query planning for memex search.
//!
//! This crate provides the foundational data structures, the query builder,
//! and the collaborator traits that the other memex crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod query;
pub mod search;
pub mod tokenizer;
pub mod traits;
pub mod url_utils;

// Re-export commonly used types at crate root
pub use config::{ConfigError, SearchConfig};
pub use error::{Error, Result};
pub use events::{BookmarkEvent, BookmarkEventBus, BookmarkNode, BookmarkRemoveInfo};
pub use models::*;
pub use query::{BuildMode, QueryBuilder};
pub use search::*;
pub use traits::*;
pub use url_utils::{extract_hostname, normalize_domain, normalize_url};
