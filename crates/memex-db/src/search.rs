//! Page full-text search over the in-memory index.

use std::time::Instant;

use tracing::{debug, instrument};

use memex_core::{PageResult, QueryPlan, Result};

use crate::pages::page_result;
use crate::store::{PageRecord, Store, Tables};

/// Whether a page passes the plan's structural filters.
pub(crate) fn page_passes_filters(tables: &Tables, page: &PageRecord, plan: &QueryPlan) -> bool {
    let on_domain =
        |set: &std::collections::BTreeSet<String>| set.contains(&page.domain) || set.contains(&page.hostname);

    if !plan.domains_inc.is_empty() && !on_domain(&plan.domains_inc) {
        return false;
    }
    if on_domain(&plan.domains_exc) {
        return false;
    }
    if !plan.tags_inc.is_empty() {
        let Some(tags) = tables.page_tags.get(&page.url) else {
            return false;
        };
        if !plan.tags_inc.iter().all(|t| tags.contains(t)) {
            return false;
        }
    }
    if !plan.collections.is_empty() && !tables.in_any_list(&page.url, &plan.collections) {
        return false;
    }
    if plan.bookmarks_only && !tables.bookmarks.contains_key(&page.url) {
        return false;
    }
    if (plan.start_date.is_some() || plan.end_date.is_some())
        && !plan.in_time_window(tables.display_time(&page.url))
    {
        return false;
    }
    true
}

/// Every included term matches and no excluded term does.
pub(crate) fn page_matches_text(page: &PageRecord, plan: &QueryPlan) -> bool {
    plan.terms.iter().all(|t| page.matches_term(t))
        && !plan.terms_exc.iter().any(|t| page.matches_term(t))
}

/// Full-text page search.
#[derive(Clone)]
pub struct MemoryFtsSearch {
    store: Store,
}

impl MemoryFtsSearch {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Pages matching terms and filters, most recent first, paginated.
    ///
    /// Ties on display time are broken by page key so the order is total.
    #[instrument(
        skip(self, plan),
        fields(subsystem = "db", component = "fts", op = "search_pages", result_count)
    )]
    pub async fn search(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        let start = Instant::now();
        let tables = self.store.read().await;

        let mut hits: Vec<PageResult> = tables
            .pages
            .values()
            .filter(|page| page_passes_filters(&tables, page, plan))
            .filter(|page| page_matches_text(page, plan))
            .map(|page| page_result(&tables, page))
            .collect();
        hits.sort_by(|a, b| b.display_time.cmp(&a.display_time).then_with(|| a.url.cmp(&b.url)));

        let results = plan.paginate(hits);
        tracing::Span::current().record("result_count", results.len());
        debug!(
            terms = plan.terms.len(),
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Page search complete"
        );
        Ok(results)
    }
}
