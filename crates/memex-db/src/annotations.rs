//! Annotation store: creation, text search and page grouping.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, instrument};

use memex_core::tokenizer::extract_terms;
use memex_core::{extract_hostname, normalize_url, Annotation, Error, PageResult, QueryPlan, Result};

use crate::pages::page_result;
use crate::store::{now_millis, registrable_domain, Store, Tables};

/// Request for [`AnnotationRepository::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateAnnotationRequest {
    pub page_url: String,
    pub page_title: Option<String>,
    pub body: Option<String>,
    pub comment: Option<String>,
    pub tags: Vec<String>,
    /// Defaults to now.
    pub created_when: Option<i64>,
}

impl CreateAnnotationRequest {
    pub fn highlight(page_url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn note(page_url: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            comment: Some(comment.into()),
            ..Default::default()
        }
    }

    pub fn created_at(mut self, time: i64) -> Self {
        self.created_when = Some(time);
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

fn annotation_text_terms(annot: &Annotation) -> Vec<String> {
    let text = format!(
        "{} {}",
        annot.body.as_deref().unwrap_or_default(),
        annot.comment.as_deref().unwrap_or_default()
    );
    extract_terms(&text, 1)
}

/// Whether an annotation passes the plan's content-type and structural filters.
fn annotation_passes_filters(tables: &Tables, annot: &Annotation, plan: &QueryPlan) -> bool {
    let kind_ok = (plan.include_highlights && annot.is_highlight())
        || (plan.include_notes && annot.is_note());
    if !kind_ok {
        return false;
    }
    if let Some(url) = plan.url.as_deref() {
        if annot.page_url != url {
            return false;
        }
    }

    let (hostname, domain) = match tables.pages.get(&annot.page_url) {
        Some(page) => (page.hostname.clone(), page.domain.clone()),
        None => {
            let host = extract_hostname(&annot.page_url).unwrap_or_default();
            let domain = registrable_domain(&host);
            (host, domain)
        }
    };
    let on_domain =
        |set: &std::collections::BTreeSet<String>| set.contains(&hostname) || set.contains(&domain);
    if !plan.domains_inc.is_empty() && !on_domain(&plan.domains_inc) {
        return false;
    }
    if on_domain(&plan.domains_exc) {
        return false;
    }
    if !plan.tags_inc.iter().all(|t| annot.tags.contains(t)) {
        return false;
    }
    if !plan.collections.is_empty() && !tables.in_any_list(&annot.page_url, &plan.collections) {
        return false;
    }
    if plan.bookmarks_only && !tables.bookmarks.contains_key(&annot.page_url) {
        return false;
    }
    plan.in_time_window(annot.created_when)
}

fn annotation_matches_text(annot: &Annotation, plan: &QueryPlan) -> bool {
    let terms = annotation_text_terms(annot);
    plan.terms.iter().all(|t| terms.contains(t)) && !plan.terms_exc.iter().any(|t| terms.contains(t))
}

/// In-memory annotation repository.
#[derive(Clone)]
pub struct AnnotationRepository {
    store: Store,
}

impl AnnotationRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Store an annotation and return its URL (`<page key>/#<created ms>`).
    pub async fn create(&self, req: CreateAnnotationRequest) -> Result<String> {
        if req.body.is_none() && req.comment.is_none() {
            return Err(Error::InvalidInput(
                "annotation needs a body or a comment".to_string(),
            ));
        }
        let page_url = normalize_url(&req.page_url);
        if page_url.is_empty() {
            return Err(Error::InvalidInput("annotation page url is empty".to_string()));
        }

        let mut tables = self.store.write().await;
        let mut created_when = req.created_when.unwrap_or_else(now_millis);
        let mut url = format!("{}/#{}", page_url, created_when);
        while tables.annotations.contains_key(&url) {
            created_when += 1;
            url = format!("{}/#{}", page_url, created_when);
        }

        let annotation = Annotation {
            url: url.clone(),
            page_url,
            page_title: req.page_title,
            body: req.body,
            comment: req.comment,
            created_when,
            last_edited: None,
            tags: req.tags.iter().map(|t| t.trim().to_lowercase()).collect(),
        };
        tables.annotations.insert(url.clone(), annotation);
        debug!(annotation_url = %url, "Annotation created");
        Ok(url)
    }

    pub async fn get(&self, url: &str) -> Result<Option<Annotation>> {
        Ok(self.store.read().await.annotations.get(url).cloned())
    }

    pub async fn delete(&self, url: &str) -> Result<bool> {
        Ok(self.store.write().await.annotations.remove(url).is_some())
    }

    /// Filtered annotations, newest first; text terms applied when `with_text`.
    async fn matching(&self, plan: &QueryPlan, with_text: bool) -> Vec<Annotation> {
        let tables = self.store.read().await;
        let mut hits: Vec<Annotation> = tables
            .annotations
            .values()
            .filter(|a| annotation_passes_filters(&tables, a, plan))
            .filter(|a| !with_text || annotation_matches_text(a, plan))
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            b.created_when
                .cmp(&a.created_when)
                .then_with(|| a.url.cmp(&b.url))
        });
        hits
    }

    /// Text search over bodies and comments, paginated.
    #[instrument(
        skip(self, plan),
        fields(subsystem = "db", component = "annotations", op = "search", result_count)
    )]
    pub async fn search(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        let start = Instant::now();
        let results = plan.paginate(self.matching(plan, true).await);
        tracing::Span::current().record("result_count", results.len());
        debug!(
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Annotation search complete"
        );
        Ok(results)
    }

    /// Structural listing without text terms, paginated.
    pub async fn list(&self, plan: &QueryPlan) -> Result<Vec<Annotation>> {
        Ok(plan.paginate(self.matching(plan, false).await))
    }

    /// Annotation matches grouped into their pages, most recently annotated first.
    ///
    /// Each page carries at most `max_annots_per_page` of its matching
    /// annotations; `annots_count` holds the full match count.
    #[instrument(
        skip(self, plan),
        fields(subsystem = "db", component = "annotations", op = "search_pages", result_count)
    )]
    pub async fn search_pages(&self, plan: &QueryPlan, with_text: bool) -> Result<Vec<PageResult>> {
        let start = Instant::now();
        let hits = self.matching(plan, with_text).await;

        let mut order: Vec<String> = Vec::new();
        let mut grouped: HashMap<String, Vec<Annotation>> = HashMap::new();
        for annot in hits {
            let group = grouped.entry(annot.page_url.clone()).or_insert_with(|| {
                order.push(annot.page_url.clone());
                Vec::new()
            });
            group.push(annot);
        }

        let tables = self.store.read().await;
        let pages: Vec<PageResult> = order
            .into_iter()
            .filter_map(|page_url| {
                let annots = grouped.remove(&page_url)?;
                let mut page = match tables.pages.get(&page_url) {
                    Some(record) => page_result(&tables, record),
                    None => {
                        let mut bare = PageResult::new(page_url.clone());
                        bare.title = annots.iter().find_map(|a| a.page_title.clone());
                        bare
                    }
                };
                page.annots_count = Some(annots.len());
                page.annotations = annots.into_iter().take(plan.max_annots_per_page).collect();
                Some(page)
            })
            .collect();

        let results = plan.paginate(pages);
        tracing::Span::current().record("result_count", results.len());
        debug!(
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Annotated page search complete"
        );
        Ok(results)
    }

    /// Distinct annotation tags starting with `prefix`.
    pub async fn tags_with_prefix(&self, prefix: &str) -> Vec<String> {
        let tables = self.store.read().await;
        tables
            .annotations
            .values()
            .flat_map(|a| a.tags.iter())
            .filter(|t| t.starts_with(prefix))
            .cloned()
            .collect()
    }
}
