//! Centralized default constants for memex.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic numbers.

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for page and annotation searches.
pub const SEARCH_LIMIT: usize = 10;

/// Default result offset.
pub const SEARCH_SKIP: usize = 0;

/// Annotations attached to each page in a blank page search.
pub const MAX_ANNOTS_PER_PAGE: usize = 10;

/// Default number of completions returned by suggest.
pub const SUGGEST_LIMIT: usize = 10;

// =============================================================================
// QUERY PARSING
// =============================================================================

/// Terms shorter than this (in characters) are dropped during normalization.
pub const MIN_TERM_LENGTH: usize = 2;

/// Prefix marking an excluded term or domain in free text.
pub const NEGATION_MARKER: char = '-';

/// Prefix marking an in-query tag filter.
pub const TAG_MARKER: char = '#';

/// Prefix marking an explicit in-query domain filter.
pub const SITE_PREFIX: &str = "site:";

// =============================================================================
// EVENTS
// =============================================================================

/// Default bookmark event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;
