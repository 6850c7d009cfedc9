//! Custom list repository.
//!
//! Lists are named groups of pages; list ids double as the `collections`
//! search filter.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use memex_core::{normalize_url, Error, Result};

use crate::store::{now_millis, CustomList, PageListEntry, Store};

/// A list together with the full URLs of its pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomListDetails {
    #[serde(flatten)]
    pub list: CustomList,
    pub pages: Vec<String>,
}

/// In-memory implementation of the custom list repository.
#[derive(Clone)]
pub struct CustomListRepository {
    store: Store,
}

impl CustomListRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn create_custom_list(&self, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("list name is empty".to_string()));
        }

        let mut tables = self.store.write().await;
        if tables.lists.values().any(|l| l.name == name) {
            return Err(Error::InvalidInput(format!("list already exists: {}", name)));
        }
        tables.next_list_id += 1;
        let id = tables.next_list_id;
        tables.lists.insert(
            id,
            CustomList {
                id,
                name: name.to_string(),
                is_deletable: true,
                is_nestable: true,
                created_at: Utc::now(),
            },
        );
        info!(list_id = id, name, "Custom list created");
        Ok(id)
    }

    pub async fn update_list(&self, id: i64, name: &str) -> Result<()> {
        let mut tables = self.store.write().await;
        let list = tables
            .lists
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("list {}", id)))?;
        list.name = name.trim().to_string();
        Ok(())
    }

    /// Remove a list and its page memberships. Pages themselves stay.
    pub async fn remove_list(&self, id: i64) -> Result<bool> {
        let mut tables = self.store.write().await;
        let removed = tables.lists.remove(&id).is_some();
        tables.list_entries.retain(|e| e.list_id != id);
        info!(list_id = id, removed, "Custom list removed");
        Ok(removed)
    }

    /// Add a page to a list, creating the page with a visit when it is unknown.
    pub async fn insert_page_to_list(&self, id: i64, url: &str) -> Result<PageListEntry> {
        let mut tables = self.store.write().await;
        if !tables.lists.contains_key(&id) {
            return Err(Error::NotFound(format!("list {}", id)));
        }

        let key = normalize_url(url);
        if !tables.pages.contains_key(&key) {
            tables.ensure_page(url);
            tables.visits.entry(key.clone()).or_default().push(now_millis());
        }

        if let Some(existing) = tables
            .list_entries
            .iter()
            .find(|e| e.list_id == id && e.page_url == key)
        {
            return Ok(existing.clone());
        }

        let entry = PageListEntry {
            list_id: id,
            page_url: key,
            full_url: url.to_string(),
            created_at: Utc::now(),
        };
        tables.list_entries.push(entry.clone());
        debug!(list_id = id, page_url = %entry.page_url, "Page added to list");
        Ok(entry)
    }

    pub async fn remove_page_from_list(&self, id: i64, url: &str) -> Result<bool> {
        let key = normalize_url(url);
        let mut tables = self.store.write().await;
        let before = tables.list_entries.len();
        tables
            .list_entries
            .retain(|e| !(e.list_id == id && e.page_url == key));
        Ok(tables.list_entries.len() < before)
    }

    pub async fn fetch_list_by_id(&self, id: i64) -> Result<Option<CustomListDetails>> {
        let tables = self.store.read().await;
        Ok(tables.lists.get(&id).map(|list| CustomListDetails {
            list: list.clone(),
            pages: tables
                .list_entries
                .iter()
                .filter(|e| e.list_id == id)
                .map(|e| e.full_url.clone())
                .collect(),
        }))
    }

    pub async fn fetch_list_pages_by_id(&self, id: i64) -> Result<Vec<PageListEntry>> {
        let tables = self.store.read().await;
        Ok(tables
            .list_entries
            .iter()
            .filter(|e| e.list_id == id)
            .cloned()
            .collect())
    }

    /// All lists, newest first.
    pub async fn fetch_all_lists(&self) -> Result<Vec<CustomList>> {
        let tables = self.store.read().await;
        let mut lists: Vec<CustomList> = tables.lists.values().cloned().collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(lists)
    }
}
