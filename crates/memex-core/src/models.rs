//! Data models for pages, annotations, and search responses.
//!
//! All models serialize with camelCase field names, the shape the UI process
//! exchanges over the remote function surface.

use serde::{Deserialize, Serialize};

// =============================================================================
// CONTENT TYPES
// =============================================================================

/// Which kinds of content a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTypes {
    /// Annotations carrying a user comment.
    pub notes: bool,
    /// Annotations carrying highlighted page text.
    pub highlights: bool,
    /// Pages matched by the full-text index.
    pub pages: bool,
}

impl Default for ContentTypes {
    fn default() -> Self {
        Self {
            notes: true,
            highlights: true,
            pages: true,
        }
    }
}

impl ContentTypes {
    /// Only pages are selected; no annotation content.
    pub fn pages_only(&self) -> bool {
        self.pages && !self.notes && !self.highlights
    }

    /// Only annotation content is selected; pages are excluded.
    pub fn annotations_only(&self) -> bool {
        !self.pages && (self.notes || self.highlights)
    }
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// A user-authored highlight or note attached to exactly one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique annotation identifier.
    pub url: String,
    /// Normalized URL key of the owning page.
    pub page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// Highlighted page text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// User comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Creation time in epoch milliseconds.
    pub created_when: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Annotation {
    /// Annotation carries a user comment.
    pub fn is_note(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Annotation carries highlighted text.
    pub fn is_highlight(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.trim().is_empty())
    }
}

// =============================================================================
// PAGES
// =============================================================================

/// A page in a search result, with display metadata and its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    /// Normalized page URL key.
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub fav_icon: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub has_bookmark: bool,
    /// Latest visit or bookmark time in epoch milliseconds.
    #[serde(default)]
    pub display_time: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub annots_count: Option<usize>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl PageResult {
    /// Create a bare result for a page key with no metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            fav_icon: None,
            screenshot: None,
            has_bookmark: false,
            display_time: 0,
            tags: Vec::new(),
            annots_count: None,
            annotations: Vec::new(),
        }
    }

    /// Attach an annotation list, replacing any existing one.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        self.annotations = annotations;
        self
    }
}

// =============================================================================
// SEARCH RESPONSE
// =============================================================================

/// Uniform response envelope for page searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEnvelope<T> {
    pub docs: Vec<T>,
    /// True iff fewer docs than the requested limit were returned.
    ///
    /// This is a heuristic: a result count that is an exact multiple of the
    /// limit reports `false` and costs one extra, empty fetch.
    pub results_exhausted: bool,
    /// Exact match count; `None` whenever no exact count was computed.
    pub total_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bad_term: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_invalid_search: Option<bool>,
}

impl<T> SearchEnvelope<T> {
    /// Shape a raw result list for the requested page size.
    pub fn from_results(docs: Vec<T>, limit: usize) -> Self {
        Self {
            results_exhausted: docs.len() < limit,
            docs,
            total_count: None,
            is_bad_term: None,
            is_invalid_search: None,
        }
    }

    /// Empty envelope flagging a query whose terms were all rejected.
    pub fn bad_term() -> Self {
        Self {
            docs: Vec::new(),
            results_exhausted: true,
            total_count: None,
            is_bad_term: Some(true),
            is_invalid_search: None,
        }
    }

    /// Empty envelope flagging contradictory filters.
    pub fn invalid_search() -> Self {
        Self {
            docs: Vec::new(),
            results_exhausted: true,
            total_count: None,
            is_bad_term: None,
            is_invalid_search: Some(true),
        }
    }
}

// =============================================================================
// GATEWAY REQUESTS
// =============================================================================

/// Bookmark creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRequest {
    pub url: String,
    /// Browser tab showing the page, when the bookmark was made from it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<i64>,
}

/// The tab currently focused in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveTab {
    pub id: i64,
    pub url: String,
}

/// What a suggest request completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestKind {
    #[default]
    Tag,
    Domain,
}

/// Prefix completion request for tags or domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub query: String,
    #[serde(default, rename = "type")]
    pub kind: SuggestKind,
    #[serde(default = "default_suggest_limit")]
    pub limit: usize,
}

fn default_suggest_limit() -> usize {
    crate::defaults::SUGGEST_LIMIT
}
