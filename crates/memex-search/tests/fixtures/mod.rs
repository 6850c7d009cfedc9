//! Test fixtures: page and annotation builders.

#![allow(dead_code)]

use memex_core::{Annotation, PageResult};

pub fn page(url: &str) -> PageResult {
    let mut page = PageResult::new(url);
    page.title = Some(format!("Title of {}", url));
    page
}

pub fn pages(urls: &[&str]) -> Vec<PageResult> {
    urls.iter().map(|url| page(url)).collect()
}

pub fn highlight(page_url: &str, id: u32) -> Annotation {
    Annotation {
        url: format!("{}/#{}", page_url, id),
        page_url: page_url.to_string(),
        page_title: None,
        body: Some(format!("highlight {}", id)),
        comment: None,
        created_when: i64::from(id),
        last_edited: None,
        tags: Vec::new(),
    }
}

pub fn annotated(url: &str, ids: &[u32]) -> PageResult {
    page(url).with_annotations(ids.iter().map(|id| highlight(url, *id)).collect())
}
