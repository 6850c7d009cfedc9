//! [`StorageGateway`] implementation for [`Database`].

use async_trait::async_trait;

use memex_core::{
    Annotation, BookmarkRequest, PageResult, QueryPlan, Result, StorageGateway, SuggestKind,
    SuggestRequest,
};

use crate::Database;

#[async_trait]
impl StorageGateway for Database {
    async fn search_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.search.search(plan).await
    }

    async fn search_pages_by_latest_annotation(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.annotations.search_pages(plan, false).await
    }

    async fn search_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        self.annotations.search(plan).await
    }

    async fn search_annotated_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.annotations.search_pages(plan, true).await
    }

    async fn list_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        self.annotations.list(plan).await
    }

    async fn add_bookmark(&self, req: BookmarkRequest) -> Result<()> {
        self.pages.add_bookmark(&req.url, req.tab_id).await
    }

    async fn delete_bookmark(&self, url: &str) -> Result<()> {
        self.pages.delete_bookmark(url).await
    }

    async fn add_tag(&self, url: &str, tag: &str) -> Result<()> {
        self.tags.add_tag(url, tag).await
    }

    async fn delete_tag(&self, url: &str, tag: &str) -> Result<()> {
        self.tags.delete_tag(url, tag).await
    }

    async fn fetch_page_tags(&self, url: &str) -> Result<Vec<String>> {
        self.tags.fetch_page_tags(url).await
    }

    async fn delete_pages(&self, urls: &[String]) -> Result<usize> {
        self.pages.delete_pages(urls).await
    }

    async fn delete_pages_by_domain(&self, domain: &str) -> Result<usize> {
        self.pages.delete_pages_by_domain(domain).await
    }

    async fn delete_pages_by_pattern(&self, pattern: &str) -> Result<usize> {
        self.pages.delete_pages_by_pattern(pattern).await
    }

    async fn matching_page_count(&self, pattern: &str) -> Result<usize> {
        self.pages.matching_page_count(pattern).await
    }

    async fn suggest(&self, req: &SuggestRequest) -> Result<Vec<String>> {
        match req.kind {
            SuggestKind::Domain => self.pages.suggest_domains(&req.query, req.limit).await,
            SuggestKind::Tag => {
                let prefix = req.query.trim().trim_start_matches('#').to_lowercase();
                let mut tags = self.tags.tags_with_prefix(&prefix).await;
                tags.extend(self.annotations.tags_with_prefix(&prefix).await);
                tags.sort();
                tags.dedup();
                tags.truncate(req.limit);
                Ok(tags)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CreateAnnotationRequest, PageDoc};

    #[tokio::test]
    async fn test_suggest_tags_merges_sources() {
        let db = Database::new();
        db.tags.add_tag("a.com", "rust").await.unwrap();
        db.annotations
            .create(CreateAnnotationRequest::note("b.com", "x").with_tags(["ruby", "rust"]))
            .await
            .unwrap();

        let req = SuggestRequest {
            query: "#RU".to_string(),
            kind: SuggestKind::Tag,
            limit: 10,
        };
        assert_eq!(db.suggest(&req).await.unwrap(), vec!["ruby", "rust"]);
    }

    #[tokio::test]
    async fn test_suggest_domains() {
        let db = Database::new();
        db.pages.add_page(PageDoc::new("http://bla.com/1")).await.unwrap();
        let req = SuggestRequest {
            query: "b".to_string(),
            kind: SuggestKind::Domain,
            limit: 10,
        };
        assert_eq!(db.suggest(&req).await.unwrap(), vec!["bla.com"]);
    }

    #[tokio::test]
    async fn test_bookmark_through_gateway() {
        let db = Database::new();
        db.add_bookmark(BookmarkRequest {
            url: "http://bla.com".to_string(),
            tab_id: Some(1),
        })
        .await
        .unwrap();
        assert!(db.pages.get_page("bla.com").await.unwrap().unwrap().has_bookmark);
    }
}
