//! Page tag repository.

use tracing::debug;

use memex_core::{normalize_url, Error, Result};

use crate::store::Store;

/// Validate a tag name.
///
/// Tags are non-empty, at most 100 characters, and contain no whitespace.
pub fn validate_tag_name(tag: &str) -> std::result::Result<(), String> {
    if tag.is_empty() {
        return Err("Tag name cannot be empty".to_string());
    }
    if tag.chars().count() > 100 {
        return Err("Tag name must be 100 characters or less".to_string());
    }
    if tag.chars().any(char::is_whitespace) {
        return Err("Tag name cannot contain whitespace".to_string());
    }
    Ok(())
}

fn clean_tag(tag: &str) -> Result<String> {
    let tag = tag.trim().trim_start_matches('#').to_lowercase();
    validate_tag_name(&tag).map_err(Error::InvalidInput)?;
    Ok(tag)
}

/// In-memory page tag repository.
#[derive(Clone)]
pub struct TagRepository {
    store: Store,
}

impl TagRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Tag a page, creating a bare page row when the URL is unknown.
    pub async fn add_tag(&self, url: &str, tag: &str) -> Result<()> {
        let tag = clean_tag(tag)?;
        let mut tables = self.store.write().await;
        let key = tables.ensure_page(url);
        debug!(page_url = %key, tag = %tag, "Tag added");
        tables.page_tags.entry(key).or_default().insert(tag);
        Ok(())
    }

    pub async fn delete_tag(&self, url: &str, tag: &str) -> Result<()> {
        let tag = clean_tag(tag)?;
        let key = normalize_url(url);
        let mut tables = self.store.write().await;
        if let Some(tags) = tables.page_tags.get_mut(&key) {
            tags.remove(&tag);
            if tags.is_empty() {
                tables.page_tags.remove(&key);
            }
        }
        Ok(())
    }

    /// Tags of one page, sorted.
    pub async fn fetch_page_tags(&self, url: &str) -> Result<Vec<String>> {
        Ok(self.store.read().await.tags_of(&normalize_url(url)))
    }

    /// Distinct page tags starting with `prefix`.
    pub async fn tags_with_prefix(&self, prefix: &str) -> Vec<String> {
        let tables = self.store.read().await;
        tables
            .page_tags
            .values()
            .flat_map(|tags| tags.iter())
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect()
    }
}
