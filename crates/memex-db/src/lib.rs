//! # memex-db
//!
//! In-memory storage layer for memex.
//!
//! This crate provides:
//! - A shared table store guarded by an async lock
//! - Repositories for pages, annotations, tags and custom lists
//! - Full-text page search and annotation search
//! - A [`Database`] that implements the [`memex_core::StorageGateway`] contract
//!
//! ## Example
//!
//! ```rust,ignore
//! use memex_db::{Database, PageDoc};
//!
//! #[tokio::main]
//! async fn main() -> memex_core::Result<()> {
//!     let db = Database::new();
//!     db.pages
//!         .add_page(PageDoc::new("https://rust-lang.org").with_title("Rust"))
//!         .await?;
//!     Ok(())
//! }
//! ```
pub mod annotations;
pub mod collections;
mod gateway;
pub mod pages;
pub mod search;
pub mod store;
pub mod tags;

pub use annotations::{AnnotationRepository, CreateAnnotationRequest};
pub use collections::{CustomListDetails, CustomListRepository};
pub use pages::{PageContent, PageDoc, PageRepository};
pub use search::MemoryFtsSearch;
pub use store::{create_store, CustomList, PageListEntry, Store};
pub use tags::{validate_tag_name, TagRepository};

/// Combined database handle with all repositories sharing one store.
#[derive(Clone)]
pub struct Database {
    store: Store,
    /// Page index, visits and bookmarks.
    pub pages: PageRepository,
    /// Annotation store.
    pub annotations: AnnotationRepository,
    /// Page tags.
    pub tags: TagRepository,
    /// Custom lists.
    pub lists: CustomListRepository,
    /// Full-text page search.
    pub search: MemoryFtsSearch,
}

impl Database {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::with_store(create_store())
    }

    /// Create a database over an existing store.
    pub fn with_store(store: Store) -> Self {
        Self {
            pages: PageRepository::new(store.clone()),
            annotations: AnnotationRepository::new(store.clone()),
            tags: TagRepository::new(store.clone()),
            lists: CustomListRepository::new(store.clone()),
            search: MemoryFtsSearch::new(store.clone()),
            store,
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
