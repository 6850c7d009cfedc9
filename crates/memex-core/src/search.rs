//! Search request types: raw caller parameters and the normalized query plan.
//!
//! [`SearchParams`] is what a caller sends; every recognized option is a named
//! field with an explicit default. [`QueryPlan`] is the validated form produced
//! by [`crate::query::QueryBuilder`] and consumed by the storage gateway.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::ContentTypes;

// =============================================================================
// RAW SEARCH PARAMETERS
// =============================================================================

/// Unvalidated search input as supplied by a caller.
///
/// Missing fields take their defaults: no text, no structural filters, all
/// content types, and pagination from [`crate::config::SearchConfig`].
///
/// # Example
///
/// ```
/// use memex_core::SearchParams;
///
/// let params: SearchParams =
///     serde_json::from_str(r#"{"query": "rust -java", "lists": [7], "limit": 5}"#).unwrap();
/// assert_eq!(params.lists, vec![7]);
/// assert_eq!(params.limit, Some(5));
/// assert!(params.content_types.pages);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchParams {
    /// Free text; may embed `-term`, `#tag`, `site:domain` and bare domains.
    pub query: Option<String>,
    /// Domains a result must belong to.
    pub domains_inc: Vec<String>,
    /// Domains a result must not belong to.
    pub domains_exc: Vec<String>,
    /// Tags a result must carry.
    pub tags_inc: Vec<String>,
    /// Custom list ids; a result must be in at least one.
    pub collections: Vec<i64>,
    /// Legacy name for `collections`; both are merged.
    pub lists: Vec<i64>,
    pub content_types: ContentTypes,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub bookmarks_only: bool,
    /// Legacy name for `bookmarks_only`; either flag enables the filter.
    pub show_only_bookmarks: bool,
    /// Lower bound of the time window, epoch milliseconds.
    pub start_date: Option<i64>,
    /// Upper bound of the time window, epoch milliseconds.
    pub end_date: Option<i64>,
    /// Annotations attached per page in blank page searches.
    pub max_annots_per_page: Option<usize>,
}

impl SearchParams {
    /// Create parameters with a free-text query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }

    /// Create parameters with no text (a blank, structural-only search).
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.domains_inc.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn without_domains(
        mut self,
        domains: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.domains_exc.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags_inc.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_collections(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.collections.extend(ids);
        self
    }

    pub fn with_content_types(mut self, content_types: ContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn bookmarks_only(mut self) -> Self {
        self.bookmarks_only = true;
        self
    }

    pub fn with_time_window(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}

// =============================================================================
// QUERY PLAN
// =============================================================================

/// Validated, normalized representation of one search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Inclusion terms; every one must match.
    pub terms: Vec<String>,
    /// Exclusion terms; none may match.
    pub terms_exc: Vec<String>,
    pub domains_inc: BTreeSet<String>,
    pub domains_exc: BTreeSet<String>,
    pub tags_inc: BTreeSet<String>,
    pub collections: BTreeSet<i64>,
    pub content_types: ContentTypes,
    pub include_notes: bool,
    pub include_highlights: bool,
    /// True iff `terms` is empty, whatever structural filters are present.
    pub is_blank_search: bool,
    pub is_bad_term: bool,
    pub is_invalid_search: bool,
    pub bookmarks_only: bool,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub skip: usize,
    pub limit: usize,
    pub max_annots_per_page: usize,
    /// Restricts annotation listing to a single page key.
    pub url: Option<String>,
}

impl QueryPlan {
    /// Derive the plan used to list one page's annotations in a blank search.
    pub fn for_page(&self, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            skip: 0,
            limit: self.max_annots_per_page,
            ..self.clone()
        }
    }

    /// Derive a plan with a different result window.
    pub fn with_window(&self, skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit,
            ..self.clone()
        }
    }

    /// Whether a timestamp falls inside the plan's time window (inclusive).
    pub fn in_time_window(&self, time: i64) -> bool {
        self.start_date.map_or(true, |start| time >= start)
            && self.end_date.map_or(true, |end| time <= end)
    }

    /// Whether any non-text filter narrows the search.
    pub fn has_structural_filters(&self) -> bool {
        !self.domains_inc.is_empty()
            || !self.domains_exc.is_empty()
            || !self.tags_inc.is_empty()
            || !self.collections.is_empty()
            || self.bookmarks_only
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Apply this plan's skip/limit window to an ordered result list.
    pub fn paginate<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.skip).take(self.limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> QueryPlan {
        QueryPlan {
            terms: vec![],
            terms_exc: vec![],
            domains_inc: BTreeSet::new(),
            domains_exc: BTreeSet::new(),
            tags_inc: BTreeSet::new(),
            collections: BTreeSet::new(),
            content_types: ContentTypes::default(),
            include_notes: true,
            include_highlights: true,
            is_blank_search: true,
            is_bad_term: false,
            is_invalid_search: false,
            bookmarks_only: false,
            start_date: None,
            end_date: None,
            skip: 4,
            limit: 10,
            max_annots_per_page: 3,
            url: None,
        }
    }

    #[test]
    fn test_params_legacy_field_names() {
        let params: SearchParams =
            serde_json::from_str(r#"{"showOnlyBookmarks": true, "lists": [1, 2]}"#).unwrap();
        assert!(params.show_only_bookmarks);
        assert_eq!(params.lists, vec![1, 2]);
        assert_eq!(params.skip, None);
        assert_eq!(params.limit, None);
    }

    #[test]
    fn test_params_builder_chaining() {
        let params = SearchParams::new("rust")
            .with_domains(["bla.com"])
            .with_tags(["lang"])
            .with_collections([3])
            .with_skip(2)
            .with_limit(5)
            .bookmarks_only();
        assert_eq!(params.query.as_deref(), Some("rust"));
        assert_eq!(params.domains_inc, vec!["bla.com"]);
        assert_eq!(params.tags_inc, vec!["lang"]);
        assert_eq!(params.collections, vec![3]);
        assert_eq!(params.skip, Some(2));
        assert_eq!(params.limit, Some(5));
        assert!(params.bookmarks_only);
    }

    #[test]
    fn test_for_page_restricts_url_and_limit() {
        let page_plan = plan().for_page("bla.com");
        assert_eq!(page_plan.url.as_deref(), Some("bla.com"));
        assert_eq!(page_plan.skip, 0);
        assert_eq!(page_plan.limit, 3);
    }

    #[test]
    fn test_in_time_window() {
        let mut p = plan();
        assert!(p.in_time_window(0));
        p.start_date = Some(100);
        p.end_date = Some(200);
        assert!(p.in_time_window(100));
        assert!(p.in_time_window(200));
        assert!(!p.in_time_window(99));
        assert!(!p.in_time_window(201));
    }

    #[test]
    fn test_paginate() {
        let p = plan().with_window(2, 3);
        assert_eq!(p.paginate((0..10).collect()), vec![2, 3, 4]);
        assert_eq!(p.paginate(vec![0, 1]), Vec::<i32>::new());
    }

    #[test]
    fn test_has_structural_filters() {
        let mut p = plan();
        assert!(!p.has_structural_filters());
        p.collections.insert(1);
        assert!(p.has_structural_filters());
    }
}
