//! # memex-search
//!
//! Search coordination for memex.
//!
//! This crate provides:
//! - Strategy selection between blank, page, annotation and combined searches
//! - Deduplicating merge of multi-source page results
//! - Global skip/limit pagination over merged results
//! - A bookmark event adapter that keeps the bookmark store in sync
//! - A remote function surface for out-of-process callers
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use memex_search::{SearchCoordinator, SearchParams};
//! use memex_db::Database;
//!
//! let coordinator = SearchCoordinator::new(Arc::new(Database::new()));
//! let envelope = coordinator
//!     .search_pages(&SearchParams::new("rust ownership").with_limit(20))
//!     .await?;
//! ```

pub mod bookmarks;
pub mod coordinator;
pub mod merge;
pub mod remote;

// Re-export core types
pub use memex_core::*;

pub use bookmarks::BookmarkEventAdapter;
pub use coordinator::{SearchCoordinator, SearchStrategy};
pub use merge::merge_search_results;
pub use remote::{RemoteFunctions, REMOTE_METHODS};
