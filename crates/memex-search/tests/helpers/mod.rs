//! Test helpers for coordinator, remote and bookmark tests.
//!
//! Provides a recording mock gateway and a fixed tab tracker.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use memex_core::{
    ActiveTab, Annotation, BookmarkRequest, Error, PageResult, QueryPlan, Result, StorageGateway,
    SuggestRequest, TabTracker,
};

/// One recorded gateway call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
    pub tab_id: Option<i64>,
}

impl MockCall {
    fn op(operation: &str, input: impl Into<String>) -> Self {
        Self {
            operation: operation.to_string(),
            input: input.into(),
            skip: None,
            limit: None,
            tab_id: None,
        }
    }

    fn plan(operation: &str, plan: &QueryPlan) -> Self {
        Self {
            skip: Some(plan.skip),
            limit: Some(plan.limit),
            ..Self::op(operation, plan.url.clone().unwrap_or_default())
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MockData {
    pages: Vec<PageResult>,
    annotated_pages: Vec<PageResult>,
    latest_pages: Vec<PageResult>,
    annotations: Vec<Annotation>,
    failure: Option<String>,
}

/// Gateway returning canned results and recording every call.
///
/// Canned page and annotation lists are windowed by the plan's skip/limit,
/// like a real backend.
#[derive(Clone, Default)]
pub struct MockGateway {
    data: Arc<MockData>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results of the legacy page search.
    pub fn with_pages(mut self, pages: Vec<PageResult>) -> Self {
        Arc::make_mut(&mut self.data).pages = pages;
        self
    }

    /// Results of the annotation search with page results.
    pub fn with_annotated_pages(mut self, pages: Vec<PageResult>) -> Self {
        Arc::make_mut(&mut self.data).annotated_pages = pages;
        self
    }

    /// Results of the latest-annotation page search.
    pub fn with_latest_pages(mut self, pages: Vec<PageResult>) -> Self {
        Arc::make_mut(&mut self.data).latest_pages = pages;
        self
    }

    /// Annotations for listing and annotation search.
    pub fn with_annotations(mut self, annotations: Vec<Annotation>) -> Self {
        Arc::make_mut(&mut self.data).annotations = annotations;
        self
    }

    /// Make every call fail with a storage error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.data).failure = Some(message.into());
        self
    }

    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<MockCall> {
        self.get_calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn record(&self, call: MockCall) -> Result<()> {
        self.call_log.lock().unwrap().push(call);
        match &self.data.failure {
            Some(message) => Err(Error::Storage(message.clone())),
            None => Ok(()),
        }
    }

    fn page_annotations(&self, plan: &QueryPlan) -> Vec<Annotation> {
        self.data
            .annotations
            .iter()
            .filter(|a| plan.url.as_deref().map_or(true, |url| a.page_url == url))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StorageGateway for MockGateway {
    async fn search_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.record(MockCall::plan("search_pages", plan))?;
        Ok(plan.paginate(self.data.pages.clone()))
    }

    async fn search_pages_by_latest_annotation(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.record(MockCall::plan("search_pages_by_latest_annotation", plan))?;
        Ok(plan.paginate(self.data.latest_pages.clone()))
    }

    async fn search_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        self.record(MockCall::plan("search_annotations", plan))?;
        Ok(plan.paginate(self.page_annotations(plan)))
    }

    async fn search_annotated_pages(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        self.record(MockCall::plan("search_annotated_pages", plan))?;
        Ok(plan.paginate(self.data.annotated_pages.clone()))
    }

    async fn list_annotations(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        self.record(MockCall::plan("list_annotations", plan))?;
        Ok(plan.paginate(self.page_annotations(plan)))
    }

    async fn add_bookmark(&self, req: BookmarkRequest) -> Result<()> {
        self.record(MockCall {
            tab_id: req.tab_id,
            ..MockCall::op("add_bookmark", req.url)
        })
    }

    async fn delete_bookmark(&self, url: &str) -> Result<()> {
        self.record(MockCall::op("delete_bookmark", url))
    }

    async fn add_tag(&self, url: &str, tag: &str) -> Result<()> {
        self.record(MockCall::op("add_tag", format!("{} {}", url, tag)))
    }

    async fn delete_tag(&self, url: &str, tag: &str) -> Result<()> {
        self.record(MockCall::op("delete_tag", format!("{} {}", url, tag)))
    }

    async fn fetch_page_tags(&self, url: &str) -> Result<Vec<String>> {
        self.record(MockCall::op("fetch_page_tags", url))?;
        Ok(Vec::new())
    }

    async fn delete_pages(&self, urls: &[String]) -> Result<usize> {
        self.record(MockCall::op("delete_pages", urls.join(",")))?;
        Ok(urls.len())
    }

    async fn delete_pages_by_domain(&self, domain: &str) -> Result<usize> {
        self.record(MockCall::op("delete_pages_by_domain", domain))?;
        Ok(0)
    }

    async fn delete_pages_by_pattern(&self, pattern: &str) -> Result<usize> {
        self.record(MockCall::op("delete_pages_by_pattern", pattern))?;
        Ok(0)
    }

    async fn matching_page_count(&self, pattern: &str) -> Result<usize> {
        self.record(MockCall::op("matching_page_count", pattern))?;
        Ok(0)
    }

    async fn suggest(&self, req: &SuggestRequest) -> Result<Vec<String>> {
        self.record(MockCall::op("suggest", req.query.clone()))?;
        Ok(Vec::new())
    }
}

/// Tab tracker with a fixed active tab.
#[derive(Debug, Clone, Default)]
pub struct FixedTab(pub Option<ActiveTab>);

impl FixedTab {
    pub fn showing(id: i64, url: &str) -> Self {
        Self(Some(ActiveTab {
            id,
            url: url.to_string(),
        }))
    }
}

#[async_trait]
impl TabTracker for FixedTab {
    async fn active_tab(&self) -> Option<ActiveTab> {
        self.0.clone()
    }
}
