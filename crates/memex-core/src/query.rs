//! Query builder: turns [`SearchParams`] into a validated [`QueryPlan`].
//!
//! # Free-text syntax
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `rust` | inclusion term |
//! | `-java` | exclusion term |
//! | `#reading` | tag filter |
//! | `bla.com`, `site:bla.com` | domain filter |
//! | `-bla.com` | excluded domain |
//!
//! # Classification
//!
//! - `is_bad_term`: the text held at least one term token, and normalization
//!   rejected all of them (too short, stop words, punctuation only).
//! - `is_invalid_search`: a domain or term is both included and excluded, or
//!   the time window ends before it starts.
//!
//! At most one flag is set; a bad term takes precedence.

use std::collections::BTreeSet;

use crate::config::SearchConfig;
use crate::defaults::{NEGATION_MARKER, SITE_PREFIX, TAG_MARKER};
use crate::error::{Error, Result};
use crate::search::{QueryPlan, SearchParams};
use crate::tokenizer::extract_terms;
use crate::url_utils::{looks_like_domain, normalize_domain};

/// How the builder reports a bad or invalid query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Classification errors are returned as `Error::BadTerm` / `Error::InvalidSearch`.
    Strict,
    /// Classification is recorded on the plan; building always succeeds.
    Tolerant,
}

/// Pieces extracted from the free-text field.
#[derive(Debug, Default)]
struct ParsedText {
    terms: Vec<String>,
    terms_exc: Vec<String>,
    domains_inc: Vec<String>,
    domains_exc: Vec<String>,
    tags: Vec<String>,
    had_term_tokens: bool,
}

/// Builds query plans. Stateless apart from its configuration.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    min_term_length: usize,
    default_limit: usize,
    max_annots_per_page: usize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(&SearchConfig::default())
    }
}

impl QueryBuilder {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            min_term_length: config.min_term_length,
            default_limit: config.default_limit,
            max_annots_per_page: config.max_annots_per_page,
        }
    }

    /// Build a plan from raw parameters.
    ///
    /// ```
    /// use memex_core::{BuildMode, Error, QueryBuilder, SearchParams};
    ///
    /// let builder = QueryBuilder::default();
    /// let plan = builder
    ///     .build(&SearchParams::new("rust -java #lang"), BuildMode::Strict)
    ///     .unwrap();
    /// assert_eq!(plan.terms, vec!["rust"]);
    /// assert_eq!(plan.terms_exc, vec!["java"]);
    /// assert!(plan.tags_inc.contains("lang"));
    ///
    /// let bad = builder.build(&SearchParams::new("a b"), BuildMode::Strict);
    /// assert!(matches!(bad, Err(Error::BadTerm)));
    /// ```
    pub fn build(&self, params: &SearchParams, mode: BuildMode) -> Result<QueryPlan> {
        let parsed = self.parse_text(params.query.as_deref().unwrap_or_default());

        let domains_inc = normalize_domains(params.domains_inc.iter().chain(&parsed.domains_inc));
        let domains_exc = normalize_domains(params.domains_exc.iter().chain(&parsed.domains_exc));
        let tags_inc: BTreeSet<String> = params
            .tags_inc
            .iter()
            .chain(&parsed.tags)
            .filter_map(|tag| normalize_tag(tag))
            .collect();
        let collections: BTreeSet<i64> = params
            .collections
            .iter()
            .chain(&params.lists)
            .copied()
            .collect();

        let is_bad_term =
            parsed.had_term_tokens && parsed.terms.is_empty() && parsed.terms_exc.is_empty();
        let contradictory_window = matches!(
            (params.start_date, params.end_date),
            (Some(start), Some(end)) if start > end
        );
        let is_invalid_search = !is_bad_term
            && (!domains_inc.is_disjoint(&domains_exc)
                || parsed.terms.iter().any(|t| parsed.terms_exc.contains(t))
                || contradictory_window);

        if mode == BuildMode::Strict {
            if is_bad_term {
                return Err(Error::BadTerm);
            }
            if is_invalid_search {
                return Err(Error::InvalidSearch);
            }
        }

        let content_types = params.content_types;
        Ok(QueryPlan {
            is_blank_search: parsed.terms.is_empty(),
            terms: parsed.terms,
            terms_exc: parsed.terms_exc,
            domains_inc,
            domains_exc,
            tags_inc,
            collections,
            content_types,
            include_notes: content_types.notes,
            include_highlights: content_types.highlights,
            is_bad_term,
            is_invalid_search,
            bookmarks_only: params.bookmarks_only || params.show_only_bookmarks,
            start_date: params.start_date,
            end_date: params.end_date,
            skip: params.skip.unwrap_or(crate::defaults::SEARCH_SKIP),
            limit: params.limit.unwrap_or(self.default_limit),
            max_annots_per_page: params.max_annots_per_page.unwrap_or(self.max_annots_per_page),
            url: None,
        })
    }

    fn parse_text(&self, text: &str) -> ParsedText {
        let mut parsed = ParsedText::default();

        for raw in text.split_whitespace() {
            let (negated, token) = match raw.strip_prefix(NEGATION_MARKER) {
                Some(rest) if !rest.is_empty() => (true, rest),
                _ => (false, raw),
            };

            if let Some(tag) = token.strip_prefix(TAG_MARKER) {
                // Excluded tags are not a supported filter; drop them.
                if !negated && !tag.is_empty() {
                    parsed.tags.push(tag.to_string());
                }
                continue;
            }

            let site = token.strip_prefix(SITE_PREFIX);
            if site.is_some() || looks_like_domain(token) {
                let target = if negated {
                    &mut parsed.domains_exc
                } else {
                    &mut parsed.domains_inc
                };
                target.push(site.unwrap_or(token).to_string());
                continue;
            }

            parsed.had_term_tokens = true;
            let target = if negated {
                &mut parsed.terms_exc
            } else {
                &mut parsed.terms
            };
            for term in extract_terms(token, self.min_term_length) {
                if !target.contains(&term) {
                    target.push(term);
                }
            }
        }

        parsed
    }
}

fn normalize_domains<'a>(domains: impl Iterator<Item = &'a String>) -> BTreeSet<String> {
    domains.filter_map(|d| normalize_domain(d)).collect()
}

fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().to_lowercase();
    (!tag.is_empty()).then_some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentTypes;

    fn build(params: SearchParams) -> QueryPlan {
        QueryBuilder::default()
            .build(&params, BuildMode::Tolerant)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let plan = build(SearchParams::blank());
        assert_eq!(plan.skip, 0);
        assert_eq!(plan.limit, 10);
        assert_eq!(plan.content_types, ContentTypes::default());
        assert!(plan.include_notes);
        assert!(plan.include_highlights);
        assert!(plan.is_blank_search);
        assert!(!plan.is_bad_term);
        assert!(!plan.is_invalid_search);
    }

    #[test]
    fn test_blank_search_regardless_of_structural_filters() {
        let params = SearchParams::blank()
            .with_domains(["bla.com"])
            .with_tags(["reading"])
            .with_collections([1])
            .bookmarks_only();
        let plan = build(params);
        assert!(plan.is_blank_search);
        assert!(plan.has_structural_filters());
    }

    #[test]
    fn test_splits_inclusion_and_exclusion_terms() {
        let plan = build(SearchParams::new("Rust async -java -Python"));
        assert_eq!(plan.terms, vec!["rust", "async"]);
        assert_eq!(plan.terms_exc, vec!["java", "python"]);
        assert!(!plan.is_blank_search);
    }

    #[test]
    fn test_exclusion_only_query_is_blank() {
        let plan = build(SearchParams::new("-java"));
        assert!(plan.is_blank_search);
        assert!(!plan.is_bad_term);
        assert_eq!(plan.terms_exc, vec!["java"]);
    }

    #[test]
    fn test_in_query_domains_and_tags() {
        let plan = build(SearchParams::new("tokio site:docs.rs -www.spam.com #Async"));
        assert_eq!(plan.terms, vec!["tokio"]);
        assert!(plan.domains_inc.contains("docs.rs"));
        assert!(plan.domains_exc.contains("spam.com"));
        assert!(plan.tags_inc.contains("async"));
    }

    #[test]
    fn test_normalizes_and_dedups_filters() {
        let params = SearchParams::blank()
            .with_domains(["https://www.Bla.com/", "bla.com"])
            .with_tags([" Reading ", "reading", ""])
            .with_collections([4, 4, 2]);
        let plan = build(params);
        assert_eq!(plan.domains_inc.len(), 1);
        assert!(plan.domains_inc.contains("bla.com"));
        assert_eq!(plan.tags_inc.len(), 1);
        assert_eq!(plan.collections.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_bad_term_when_all_terms_too_short() {
        let plan = build(SearchParams::new("a b c"));
        assert!(plan.is_bad_term);
        assert!(!plan.is_invalid_search);

        let strict = QueryBuilder::default().build(&SearchParams::new("a b c"), BuildMode::Strict);
        assert!(matches!(strict, Err(Error::BadTerm)));
    }

    #[test]
    fn test_bad_term_for_stop_words_only() {
        assert!(build(SearchParams::new("the of and")).is_bad_term);
    }

    #[test]
    fn test_not_bad_when_one_term_survives() {
        let plan = build(SearchParams::new("a rust"));
        assert!(!plan.is_bad_term);
        assert_eq!(plan.terms, vec!["rust"]);
    }

    #[test]
    fn test_filter_only_text_is_not_bad() {
        let plan = build(SearchParams::new("#reading bla.com"));
        assert!(!plan.is_bad_term);
        assert!(plan.is_blank_search);
    }

    #[test]
    fn test_empty_text_is_not_bad() {
        assert!(!build(SearchParams::new("   ")).is_bad_term);
    }

    #[test]
    fn test_invalid_when_domain_included_and_excluded() {
        let params = SearchParams::blank()
            .with_domains(["bla.com"])
            .without_domains(["www.bla.com"]);
        let plan = build(params.clone());
        assert!(plan.is_invalid_search);
        assert!(!plan.is_bad_term);

        let strict = QueryBuilder::default().build(&params, BuildMode::Strict);
        assert!(matches!(strict, Err(Error::InvalidSearch)));
    }

    #[test]
    fn test_invalid_when_term_included_and_excluded() {
        assert!(build(SearchParams::new("rust -rust")).is_invalid_search);
    }

    #[test]
    fn test_invalid_when_time_window_reversed() {
        let plan = build(SearchParams::blank().with_time_window(Some(200), Some(100)));
        assert!(plan.is_invalid_search);
        let plan = build(SearchParams::blank().with_time_window(Some(100), Some(200)));
        assert!(!plan.is_invalid_search);
    }

    #[test]
    fn test_bad_term_takes_precedence_over_invalid() {
        let params = SearchParams::new("a")
            .with_domains(["bla.com"])
            .without_domains(["bla.com"]);
        let plan = build(params);
        assert!(plan.is_bad_term);
        assert!(!plan.is_invalid_search);
    }

    #[test]
    fn test_build_is_idempotent() {
        let params = SearchParams::new("rust -java #tag bla.com").with_limit(3);
        let builder = QueryBuilder::default();
        let a = builder.build(&params, BuildMode::Strict).unwrap();
        let b = builder.build(&params, BuildMode::Strict).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_config_drives_limits_and_term_length() {
        let config = SearchConfig {
            default_limit: 25,
            max_annots_per_page: 2,
            min_term_length: 4,
            ..Default::default()
        };
        let builder = QueryBuilder::new(&config);
        let plan = builder
            .build(&SearchParams::new("rust tokio"), BuildMode::Tolerant)
            .unwrap();
        assert_eq!(plan.limit, 25);
        assert_eq!(plan.max_annots_per_page, 2);
        assert_eq!(plan.terms, vec!["rust", "tokio"]);

        let plan = builder
            .build(&SearchParams::new("go"), BuildMode::Tolerant)
            .unwrap();
        assert!(plan.is_bad_term);
    }

    #[test]
    fn test_legacy_field_names_merge() {
        let params: SearchParams = serde_json::from_str(
            r#"{"bookmarksOnly": false, "showOnlyBookmarks": true, "collections": [1], "lists": [2]}"#,
        )
        .unwrap();
        let plan = build(params);
        assert!(plan.bookmarks_only);
        assert_eq!(plan.collections, BTreeSet::from([1, 2]));

        let plan = build(serde_json::from_str(r#"{"collections": [3], "lists": [3]}"#).unwrap());
        assert!(!plan.bookmarks_only);
        assert_eq!(plan.collections, BTreeSet::from([3]));
    }

    #[test]
    fn test_explicit_pagination_and_window() {
        let plan = build(
            SearchParams::blank()
                .with_skip(20)
                .with_limit(5)
                .with_time_window(Some(1), Some(2)),
        );
        assert_eq!(plan.skip, 20);
        assert_eq!(plan.limit, 5);
        assert_eq!(plan.start_date, Some(1));
        assert_eq!(plan.end_date, Some(2));
    }
}
