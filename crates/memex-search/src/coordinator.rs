//! Search coordination across page, annotation and blank searches.
//!
//! The coordinator builds a query plan, picks a strategy from the plan's
//! content types and terms, runs the matching gateway calls, merges and
//! paginates, and wraps the outcome in a [`SearchEnvelope`].

use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use memex_core::{
    Annotation, BuildMode, Error, PageResult, QueryBuilder, QueryPlan, Result, SearchConfig,
    SearchEnvelope, SearchParams, StorageGateway,
};

use crate::merge::merge_search_results;

/// Search strategy chosen for a page search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// No terms: structural search with per-page annotation lookups.
    Blank,
    /// No terms, annotation content only: pages by latest annotation.
    BlankAnnotations,
    /// Page content only.
    Pages,
    /// Annotation content only, grouped into pages.
    Annotations,
    /// Page and annotation searches merged.
    Combined,
}

impl SearchStrategy {
    /// Pick the strategy for a plan.
    pub fn for_plan(plan: &QueryPlan) -> Self {
        if plan.is_blank_search {
            if plan.content_types.annotations_only() {
                SearchStrategy::BlankAnnotations
            } else {
                SearchStrategy::Blank
            }
        } else if plan.content_types.pages_only() {
            SearchStrategy::Pages
        } else if plan.content_types.annotations_only() {
            SearchStrategy::Annotations
        } else {
            SearchStrategy::Combined
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchStrategy::Blank => "blank",
            SearchStrategy::BlankAnnotations => "blank_annotations",
            SearchStrategy::Pages => "pages",
            SearchStrategy::Annotations => "annotations",
            SearchStrategy::Combined => "combined",
        }
    }
}

/// Entry point for page and annotation searches.
#[derive(Clone)]
pub struct SearchCoordinator {
    gateway: Arc<dyn StorageGateway>,
    builder: QueryBuilder,
}

impl SearchCoordinator {
    /// Create a coordinator with default configuration.
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self {
            gateway,
            builder: QueryBuilder::default(),
        }
    }

    /// Create a coordinator using the given configuration.
    pub fn with_config(gateway: Arc<dyn StorageGateway>, config: &SearchConfig) -> Self {
        Self {
            gateway,
            builder: QueryBuilder::new(config),
        }
    }

    pub fn gateway(&self) -> &Arc<dyn StorageGateway> {
        &self.gateway
    }

    /// Search pages.
    ///
    /// Bad-term and invalid queries produce an empty, exhausted envelope
    /// carrying the matching flag. Gateway errors propagate unchanged.
    #[instrument(
        skip(self, params),
        fields(
            subsystem = "search",
            component = "coordinator",
            op = "search_pages",
            strategy,
            result_count
        )
    )]
    pub async fn search_pages(&self, params: &SearchParams) -> Result<SearchEnvelope<PageResult>> {
        let start = Instant::now();

        let plan = match self.builder.build(params, BuildMode::Strict) {
            Ok(plan) => plan,
            Err(Error::BadTerm) => {
                debug!("Query has no usable terms");
                return Ok(SearchEnvelope::bad_term());
            }
            Err(Error::InvalidSearch) => {
                debug!("Query filters contradict each other");
                return Ok(SearchEnvelope::invalid_search());
            }
            Err(e) => return Err(e),
        };

        let strategy = SearchStrategy::for_plan(&plan);
        tracing::Span::current().record("strategy", strategy.as_str());

        let docs = match strategy {
            SearchStrategy::Blank => self.blank_page_search(&plan).await?,
            SearchStrategy::BlankAnnotations => {
                self.gateway.search_pages_by_latest_annotation(&plan).await?
            }
            SearchStrategy::Pages => self.gateway.search_pages(&plan).await?,
            SearchStrategy::Annotations => self.gateway.search_annotated_pages(&plan).await?,
            SearchStrategy::Combined => self.combined_search(&plan).await?,
        };

        tracing::Span::current().record("result_count", docs.len());
        info!(
            strategy = strategy.as_str(),
            result_count = docs.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Page search complete"
        );
        Ok(SearchEnvelope::from_results(docs, plan.limit))
    }

    /// Search annotations.
    ///
    /// Bad-term and invalid queries return an empty list. Blank queries list
    /// annotations by structural filters only.
    #[instrument(
        skip(self, params),
        fields(
            subsystem = "search",
            component = "coordinator",
            op = "search_annotations",
            result_count
        )
    )]
    pub async fn search_annotations(&self, params: &SearchParams) -> Result<Vec<Annotation>> {
        let start = Instant::now();
        let plan = self.builder.build(params, BuildMode::Tolerant)?;

        if plan.is_bad_term || plan.is_invalid_search {
            debug!(
                bad_term = plan.is_bad_term,
                invalid = plan.is_invalid_search,
                "Annotation query rejected"
            );
            return Ok(Vec::new());
        }

        let annotations = if plan.is_blank_search {
            self.gateway.list_annotations(&plan).await?
        } else {
            self.gateway.search_annotations(&plan).await?
        };

        tracing::Span::current().record("result_count", annotations.len());
        info!(
            result_count = annotations.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Annotation search complete"
        );
        Ok(annotations)
    }

    /// Structural page search with each page's annotations attached.
    async fn blank_page_search(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        let pages = self.gateway.search_pages(plan).await?;

        let lookups = pages.iter().map(|page| {
            let page_plan = plan.for_page(&page.url);
            let gateway = &self.gateway;
            async move { gateway.list_annotations(&page_plan).await }
        });
        let annotations = try_join_all(lookups).await?;

        debug!(page_hits = pages.len(), "Blank search annotations fetched");
        Ok(pages
            .into_iter()
            .zip(annotations)
            .map(|(page, annots)| page.with_annotations(annots))
            .collect())
    }

    /// Run page and annotated-page searches concurrently, merge, then paginate.
    ///
    /// Both sources are asked for the first `skip + limit` results so the
    /// window is applied only to the merged list.
    async fn combined_search(&self, plan: &QueryPlan) -> Result<Vec<PageResult>> {
        let window = plan.with_window(0, plan.skip.saturating_add(plan.limit));

        let (pages, annotated) = tokio::try_join!(
            self.gateway.search_pages(&window),
            self.gateway.search_annotated_pages(&window),
        )?;
        debug!(
            page_hits = pages.len(),
            annot_hits = annotated.len(),
            "Combined search sources complete"
        );

        Ok(plan.paginate(merge_search_results(vec![pages, annotated])))
    }
}
