//! Page repository: indexing, visits, bookmarks and page deletion.

use regex::Regex;
use tracing::{debug, info};

use memex_core::tokenizer::{extract_terms, split_words};
use memex_core::{extract_hostname, normalize_domain, normalize_url, Error, PageResult, Result};

use crate::store::{now_millis, BookmarkRecord, PageRecord, Store, Tables};

/// Indexed terms keep single-character words so that any query term can match.
const INDEX_MIN_TERM_LENGTH: usize = 1;

/// Extracted page content to index.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub full_text: Option<String>,
    pub title: Option<String>,
}

/// Page document handed to [`PageRepository::add_page`].
#[derive(Debug, Clone, Default)]
pub struct PageDoc {
    pub url: String,
    pub content: PageContent,
    pub visits: Vec<i64>,
    pub bookmark: Option<i64>,
    pub screenshot: Option<String>,
    pub fav_icon: Option<String>,
}

impl PageDoc {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.content.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.full_text = Some(text.into());
        self
    }

    pub fn with_visit(mut self, time: i64) -> Self {
        self.visits.push(time);
        self
    }

    pub fn with_bookmark(mut self, time: i64) -> Self {
        self.bookmark = Some(time);
        self
    }
}

/// Build the display row for a page.
pub(crate) fn page_result(tables: &Tables, page: &PageRecord) -> PageResult {
    let mut result = PageResult::new(page.url.clone());
    result.title = page.title.clone();
    result.screenshot = page.screenshot.clone();
    result.fav_icon = tables.fav_icons.get(&page.hostname).cloned();
    result.has_bookmark = tables.bookmarks.contains_key(&page.url);
    result.display_time = tables.display_time(&page.url);
    result.tags = tables.tags_of(&page.url);
    result
}

/// In-memory page repository.
#[derive(Clone)]
pub struct PageRepository {
    store: Store,
}

impl PageRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Index a page, merging into an existing row with the same key.
    pub async fn add_page(&self, doc: PageDoc) -> Result<String> {
        if doc.url.trim().is_empty() {
            return Err(Error::InvalidInput("page url is empty".to_string()));
        }

        let mut tables = self.store.write().await;
        let key = tables.ensure_page(&doc.url);

        if let Some(page) = tables.pages.get_mut(&key) {
            page.full_url = doc.url.clone();
            if let Some(text) = doc.content.full_text.as_deref() {
                page.terms = extract_terms(text, INDEX_MIN_TERM_LENGTH).into_iter().collect();
            }
            if let Some(title) = doc.content.title {
                page.title_terms = extract_terms(&title, INDEX_MIN_TERM_LENGTH)
                    .into_iter()
                    .collect();
                page.title = Some(title);
            }
            page.url_terms = split_words(&key).collect();
            if doc.screenshot.is_some() {
                page.screenshot = doc.screenshot;
            }
        }

        if !doc.visits.is_empty() {
            tables
                .visits
                .entry(key.clone())
                .or_default()
                .extend(doc.visits);
        }
        if let Some(time) = doc.bookmark {
            tables.bookmarks.insert(key.clone(), BookmarkRecord { time, tab_id: None });
        }
        if let Some(icon) = doc.fav_icon {
            let host = extract_hostname(&doc.url).unwrap_or_else(|| key.clone());
            tables.fav_icons.insert(host, icon);
        }

        debug!(page_url = %key, "Indexed page");
        Ok(key)
    }

    pub async fn get_page(&self, url: &str) -> Result<Option<PageResult>> {
        let tables = self.store.read().await;
        Ok(tables
            .pages
            .get(&normalize_url(url))
            .map(|page| page_result(&tables, page)))
    }

    pub async fn add_visit(&self, url: &str, time: i64) -> Result<()> {
        let mut tables = self.store.write().await;
        let key = tables.ensure_page(url);
        tables.visits.entry(key).or_default().push(time);
        Ok(())
    }

    pub async fn add_fav_icon(&self, url: &str, icon: &str) -> Result<()> {
        let host = extract_hostname(url)
            .ok_or_else(|| Error::InvalidInput(format!("no hostname in {}", url)))?;
        self.store.write().await.fav_icons.insert(host, icon.to_string());
        Ok(())
    }

    /// Bookmark a page, creating a bare page row when the URL is unknown.
    pub async fn add_bookmark(&self, url: &str, tab_id: Option<i64>) -> Result<()> {
        let mut tables = self.store.write().await;
        let key = tables.ensure_page(url);
        tables.bookmarks.insert(
            key.clone(),
            BookmarkRecord {
                time: now_millis(),
                tab_id,
            },
        );
        debug!(page_url = %key, tab_id = ?tab_id, "Bookmark added");
        Ok(())
    }

    pub async fn delete_bookmark(&self, url: &str) -> Result<()> {
        let key = normalize_url(url);
        let removed = self.store.write().await.bookmarks.remove(&key).is_some();
        debug!(page_url = %key, removed, "Bookmark deleted");
        Ok(())
    }

    pub async fn delete_pages(&self, urls: &[String]) -> Result<usize> {
        let mut tables = self.store.write().await;
        let deleted = urls
            .iter()
            .map(|url| normalize_url(url))
            .filter(|key| tables.remove_page(key))
            .count();
        info!(requested = urls.len(), deleted, "Deleted pages");
        Ok(deleted)
    }

    /// Delete every page whose hostname or registrable domain equals `domain`.
    pub async fn delete_pages_by_domain(&self, domain: &str) -> Result<usize> {
        let domain = normalize_domain(domain)
            .ok_or_else(|| Error::InvalidInput(format!("invalid domain: {}", domain)))?;
        let mut tables = self.store.write().await;
        let keys: Vec<String> = tables
            .pages
            .values()
            .filter(|p| p.domain == domain || p.hostname == domain)
            .map(|p| p.url.clone())
            .collect();
        for key in &keys {
            tables.remove_page(key);
        }
        info!(domain = %domain, deleted = keys.len(), "Deleted pages by domain");
        Ok(keys.len())
    }

    pub async fn delete_pages_by_pattern(&self, pattern: &str) -> Result<usize> {
        let re = Regex::new(pattern)?;
        let mut tables = self.store.write().await;
        let keys: Vec<String> = tables
            .pages
            .keys()
            .filter(|key| re.is_match(key))
            .cloned()
            .collect();
        for key in &keys {
            tables.remove_page(key);
        }
        info!(pattern, deleted = keys.len(), "Deleted pages by pattern");
        Ok(keys.len())
    }

    pub async fn matching_page_count(&self, pattern: &str) -> Result<usize> {
        let re = Regex::new(pattern)?;
        let tables = self.store.read().await;
        Ok(tables.pages.keys().filter(|key| re.is_match(key)).count())
    }

    /// Distinct hostnames starting with `prefix`, sorted.
    pub async fn suggest_domains(&self, prefix: &str, limit: usize) -> Result<Vec<String>> {
        let prefix = prefix.trim().to_lowercase();
        let tables = self.store.read().await;
        let mut hosts: Vec<String> = tables
            .pages
            .values()
            .map(|p| p.hostname.clone())
            .filter(|h| h.starts_with(&prefix))
            .collect();
        hosts.sort();
        hosts.dedup();
        hosts.truncate(limit);
        Ok(hosts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::create_store;

    #[tokio::test]
    async fn test_add_and_get_page() {
        let repo = PageRepository::new(create_store());
        let key = repo
            .add_page(
                PageDoc::new("http://www.bla.com/")
                    .with_title("Bla home")
                    .with_visit(100)
                    .with_bookmark(50),
            )
            .await
            .unwrap();
        assert_eq!(key, "bla.com");

        let page = repo.get_page("https://bla.com").await.unwrap().unwrap();
        assert_eq!(page.title.as_deref(), Some("Bla home"));
        assert!(page.has_bookmark);
        assert_eq!(page.display_time, 100);
    }

    #[tokio::test]
    async fn test_add_page_rejects_empty_url() {
        let repo = PageRepository::new(create_store());
        assert!(repo.add_page(PageDoc::new("  ")).await.is_err());
    }

    #[tokio::test]
    async fn test_bookmark_creates_bare_page() {
        let repo = PageRepository::new(create_store());
        repo.add_bookmark("http://new.com/x", Some(3)).await.unwrap();
        let page = repo.get_page("new.com/x").await.unwrap().unwrap();
        assert!(page.has_bookmark);

        repo.delete_bookmark("http://new.com/x").await.unwrap();
        let page = repo.get_page("new.com/x").await.unwrap().unwrap();
        assert!(!page.has_bookmark);
    }

    #[tokio::test]
    async fn test_delete_by_domain_and_pattern() {
        let repo = PageRepository::new(create_store());
        for url in [
            "http://en.wiki.org/a",
            "http://wiki.org/b",
            "http://other.com/wiki",
            "http://other.com/c",
        ] {
            repo.add_page(PageDoc::new(url)).await.unwrap();
        }

        assert_eq!(repo.matching_page_count("wiki").await.unwrap(), 3);
        assert_eq!(repo.delete_pages_by_domain("wiki.org").await.unwrap(), 2);
        assert_eq!(repo.delete_pages_by_pattern("^other\\.com/w").await.unwrap(), 1);
        assert_eq!(repo.matching_page_count(".*").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bad_pattern_is_invalid_input() {
        let repo = PageRepository::new(create_store());
        let err = repo.matching_page_count("(").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_suggest_domains() {
        let repo = PageRepository::new(create_store());
        for url in ["http://bla.com/1", "http://bla.com/2", "http://blub.org", "http://x.com"] {
            repo.add_page(PageDoc::new(url)).await.unwrap();
        }
        assert_eq!(
            repo.suggest_domains("BL", 10).await.unwrap(),
            vec!["bla.com", "blub.org"]
        );
        assert_eq!(repo.suggest_domains("bl", 1).await.unwrap(), vec!["bla.com"]);
    }
}
