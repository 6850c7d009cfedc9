//! Structured logging schema and field name constants for memex.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same field names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Failed index mutation, event handler failure |
//! | WARN  | Recoverable issue (lagged event receiver, rejected query) |
//! | INFO  | Lifecycle events, search completions |
//! | DEBUG | Strategy selection, intermediate counts |
//! | TRACE | Per-page fan-out, per-event details |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one remote call.
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "search", "db", "events"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "search_coordinator", "result_merger", "bookmark_adapter"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search_pages", "search_annotations", "on_bookmark_created"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Normalized page URL key.
pub const PAGE_URL: &str = "page_url";

/// Browser bookmark node id.
pub const BOOKMARK_ID: &str = "bookmark_id";

/// Browser tab id.
pub const TAB_ID: &str = "tab_id";

/// Search query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search.
pub const RESULT_COUNT: &str = "result_count";

// ─── Search-specific fields ────────────────────────────────────────────────

/// Strategy selected for a page search.
/// Values: "blank", "blank_annotations", "pages", "annotations", "combined"
pub const STRATEGY: &str = "strategy";

/// Number of page-search results before merging.
pub const PAGE_HITS: &str = "page_hits";

/// Number of annotation-search page results before merging.
pub const ANNOT_HITS: &str = "annot_hits";

/// Number of source lists fed to the merger.
pub const SOURCE_COUNT: &str = "source_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
