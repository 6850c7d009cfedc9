//! Shared in-memory tables.
//!
//! Every repository holds a clone of the same [`Store`]; the tables are
//! guarded by a single async `RwLock` so multi-table mutations (deleting a
//! page together with its visits, bookmark, tags and list entries) stay atomic.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use memex_core::{extract_hostname, Annotation};

/// Shared handle to the in-memory tables.
pub type Store = Arc<RwLock<Tables>>;

/// Create an empty store.
pub fn create_store() -> Store {
    Arc::new(RwLock::new(Tables::default()))
}

/// Current time in epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Indexed page row.
#[derive(Debug, Clone, Default)]
pub struct PageRecord {
    /// Normalized key.
    pub url: String,
    pub full_url: String,
    pub domain: String,
    pub hostname: String,
    pub title: Option<String>,
    pub screenshot: Option<String>,
    /// Terms from the page text.
    pub terms: BTreeSet<String>,
    pub title_terms: BTreeSet<String>,
    pub url_terms: BTreeSet<String>,
}

impl PageRecord {
    /// Bare page row for a URL that has no indexed content yet.
    pub fn from_url(full_url: &str) -> Self {
        let url = memex_core::normalize_url(full_url);
        let hostname = extract_hostname(full_url).unwrap_or_else(|| url.clone());
        Self {
            domain: registrable_domain(&hostname),
            hostname,
            full_url: full_url.to_string(),
            url,
            ..Default::default()
        }
    }

    pub fn matches_term(&self, term: &str) -> bool {
        self.terms.contains(term) || self.title_terms.contains(term) || self.url_terms.contains(term)
    }
}

/// Bookmark row, keyed by page URL in [`Tables::bookmarks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub time: i64,
    pub tab_id: Option<i64>,
}

/// User-defined page list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomList {
    pub id: i64,
    pub name: String,
    pub is_deletable: bool,
    pub is_nestable: bool,
    pub created_at: DateTime<Utc>,
}

/// Membership of a page in a custom list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListEntry {
    pub list_id: i64,
    pub page_url: String,
    pub full_url: String,
    pub created_at: DateTime<Utc>,
}

/// All tables of the in-memory store.
#[derive(Debug, Default)]
pub struct Tables {
    pub pages: HashMap<String, PageRecord>,
    /// Visit times per page key, unordered.
    pub visits: HashMap<String, Vec<i64>>,
    pub bookmarks: HashMap<String, BookmarkRecord>,
    pub page_tags: HashMap<String, BTreeSet<String>>,
    /// Favicon data URIs keyed by hostname.
    pub fav_icons: HashMap<String, String>,
    /// Annotations keyed by annotation URL.
    pub annotations: BTreeMap<String, Annotation>,
    pub lists: BTreeMap<i64, CustomList>,
    pub list_entries: Vec<PageListEntry>,
    pub next_list_id: i64,
}

impl Tables {
    /// Latest visit time, falling back to the bookmark time.
    pub fn display_time(&self, url: &str) -> i64 {
        let latest_visit = self
            .visits
            .get(url)
            .and_then(|times| times.iter().copied().max());
        let bookmark = self.bookmarks.get(url).map(|b| b.time);
        latest_visit.max(bookmark).unwrap_or(0)
    }

    pub fn tags_of(&self, url: &str) -> Vec<String> {
        self.page_tags
            .get(url)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn in_any_list(&self, url: &str, lists: &BTreeSet<i64>) -> bool {
        self.list_entries
            .iter()
            .any(|e| e.page_url == url && lists.contains(&e.list_id))
    }

    /// Insert a bare page row when the URL is unknown. Returns the page key.
    pub fn ensure_page(&mut self, full_url: &str) -> String {
        let record = PageRecord::from_url(full_url);
        let key = record.url.clone();
        self.pages.entry(key.clone()).or_insert(record);
        key
    }

    /// Remove a page and every row hanging off it. Annotations are kept.
    pub fn remove_page(&mut self, url: &str) -> bool {
        let existed = self.pages.remove(url).is_some();
        self.visits.remove(url);
        self.bookmarks.remove(url);
        self.page_tags.remove(url);
        self.list_entries.retain(|e| e.page_url != url);
        existed
    }
}

/// Last two labels of a hostname (`en.wikipedia.org` -> `wikipedia.org`).
pub(crate) fn registrable_domain(hostname: &str) -> String {
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        hostname.to_string()
    } else {
        labels[labels.len() - 2..].join(".")
    }
}
