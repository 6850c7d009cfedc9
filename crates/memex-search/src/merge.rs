//! Merging of multi-source page results.

use std::collections::HashMap;

use tracing::debug;

use memex_core::PageResult;

/// Merge page result lists from several sources into one deduplicated list.
///
/// Sources are walked in the order given. Each page key appears once in the
/// output, at the position where it was first seen; its metadata comes from
/// that first entry. Annotation lists of later duplicates are appended, and
/// only annotations owned by the page itself are kept.
///
/// The output is not re-sorted: first-seen order across the concatenated
/// sources is the final order.
pub fn merge_search_results(sources: Vec<Vec<PageResult>>) -> Vec<PageResult> {
    let source_count = sources.len();
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, PageResult> = HashMap::new();

    for page in sources.into_iter().flatten() {
        match merged.get_mut(&page.url) {
            Some(acc) => {
                acc.annotations.extend(page.annotations);
                if acc.annots_count.is_none() {
                    acc.annots_count = page.annots_count;
                }
            }
            None => {
                order.push(page.url.clone());
                merged.insert(page.url.clone(), page);
            }
        }
    }

    let results: Vec<PageResult> = order
        .into_iter()
        .filter_map(|url| merged.remove(&url))
        .map(|mut page| {
            let owner = page.url.clone();
            page.annotations.retain(|a| a.page_url == owner);
            page
        })
        .collect();

    debug!(
        source_count,
        result_count = results.len(),
        "Merged search results"
    );
    results
}
