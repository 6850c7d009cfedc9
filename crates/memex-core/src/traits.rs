//! Core traits for memex collaborators.
//!
//! The search core reaches every data source through these traits, so any
//! backend (in-memory, persistent, or a test double) can be injected.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ActiveTab, Annotation, BookmarkRequest, PageResult, SuggestRequest};
use crate::search::QueryPlan;

// =============================================================================
// STORAGE GATEWAY
// =============================================================================

/// Typed contract over the full-text index, annotation store and bookmark store.
///
/// Search operations honor the plan's structural filters and its `skip`/`limit`
/// window, returning results already ordered by the backend's relevance or
/// recency criterion.
#[async_trait]
pub trait StorageGateway: Send + Sync {
    // ─── Full-text index ───────────────────────────────────────────────

    /// Legacy page search: plan terms plus structural filters.
    /// A blank plan matches on structural filters alone.
    async fn search_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>>;

    /// Pages having at least one annotation matching the plan, most recently
    /// annotated first, with those annotations attached.
    async fn search_pages_by_latest_annotation(&self, plan: &QueryPlan)
        -> Result<Vec<PageResult>>;

    // ─── Annotation store ──────────────────────────────────────────────

    /// Text search over annotation bodies and comments.
    async fn search_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>>;

    /// Text search over annotations, grouped into their owning pages.
    /// Annotation matches decide which pages appear.
    async fn search_annotated_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>>;

    /// Annotations matching only the structural filters (no text ranking).
    /// When `plan.url` is set, only that page's annotations are listed.
    async fn list_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>>;

    // ─── Bookmark store ────────────────────────────────────────────────

    async fn add_bookmark(&self, req: BookmarkRequest) -> Result<()>;

    async fn delete_bookmark(&self, url: &str) -> Result<()>;

    // ─── Pass-through operations ───────────────────────────────────────

    async fn add_tag(&self, url: &str, tag: &str) -> Result<()>;

    async fn delete_tag(&self, url: &str, tag: &str) -> Result<()>;

    async fn fetch_page_tags(&self, url: &str) -> Result<Vec<String>>;

    /// Delete pages by URL, returning how many existed.
    async fn delete_pages(&self, urls: &[String]) -> Result<usize>;

    async fn delete_pages_by_domain(&self, domain: &str) -> Result<usize>;

    /// Delete pages whose key matches a regular expression.
    async fn delete_pages_by_pattern(&self, pattern: &str) -> Result<usize>;

    /// Count pages whose key matches a regular expression.
    async fn matching_page_count(&self, pattern: &str) -> Result<usize>;

    async fn suggest(&self, req: &SuggestRequest) -> Result<Vec<String>>;
}

// =============================================================================
// TAB TRACKER
// =============================================================================

/// Read-only view of the browser's active tab, owned by an external tracker.
#[async_trait]
pub trait TabTracker: Send + Sync {
    async fn active_tab(&self) -> Option<ActiveTab>;
}

/// Tracker for hosts without tab information.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActiveTab;

#[async_trait]
impl TabTracker for NoActiveTab {
    async fn active_tab(&self) -> Option<ActiveTab> {
        None
    }
}
