//! Remote function surface.
//!
//! Maps remote method names to coordinator searches and gateway
//! pass-through operations. Arguments and results are JSON values.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use memex_core::{BookmarkRequest, Error, Result, SearchParams, SuggestRequest};

use crate::coordinator::SearchCoordinator;

/// Names accepted by [`RemoteFunctions::call`].
pub const REMOTE_METHODS: &[&str] = &[
    "searchPages",
    "searchAnnotations",
    "addTag",
    "delTag",
    "fetchPageTags",
    "addBookmark",
    "delBookmark",
    "delPages",
    "delPagesByDomain",
    "delPagesByPattern",
    "getMatchingPageCount",
    "suggest",
];

#[derive(Debug, Deserialize)]
struct TagArgs {
    url: String,
    tag: String,
}

#[derive(Debug, Deserialize)]
struct UrlArgs {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UrlsArgs {
    urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DomainArgs {
    domain: String,
}

#[derive(Debug, Deserialize)]
struct PatternArgs {
    pattern: String,
}

fn decode<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = if args.is_null() { json!({}) } else { args };
    Ok(serde_json::from_value(args)?)
}

/// Remote-callable functions over a coordinator and its gateway.
#[derive(Clone)]
pub struct RemoteFunctions {
    coordinator: SearchCoordinator,
}

impl RemoteFunctions {
    pub fn new(coordinator: SearchCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn coordinator(&self) -> &SearchCoordinator {
        &self.coordinator
    }

    /// Dispatch a remote call.
    ///
    /// Unknown methods return [`Error::NotFound`]; malformed arguments return
    /// [`Error::Serialization`].
    #[instrument(skip(self, args), fields(subsystem = "search", component = "remote", op = method))]
    pub async fn call(&self, method: &str, args: Value) -> Result<Value> {
        let gateway = self.coordinator.gateway();
        debug!("Remote call");

        let result = match method {
            "searchPages" => {
                let params: SearchParams = decode(args)?;
                serde_json::to_value(self.coordinator.search_pages(&params).await?)?
            }
            "searchAnnotations" => {
                let params: SearchParams = decode(args)?;
                serde_json::to_value(self.coordinator.search_annotations(&params).await?)?
            }
            "addTag" => {
                let a: TagArgs = decode(args)?;
                gateway.add_tag(&a.url, &a.tag).await?;
                Value::Null
            }
            "delTag" => {
                let a: TagArgs = decode(args)?;
                gateway.delete_tag(&a.url, &a.tag).await?;
                Value::Null
            }
            "fetchPageTags" => {
                let a: UrlArgs = decode(args)?;
                json!(gateway.fetch_page_tags(&a.url).await?)
            }
            "addBookmark" => {
                let req: BookmarkRequest = decode(args)?;
                gateway.add_bookmark(req).await?;
                Value::Null
            }
            "delBookmark" => {
                let a: UrlArgs = decode(args)?;
                gateway.delete_bookmark(&a.url).await?;
                Value::Null
            }
            "delPages" => {
                let a: UrlsArgs = decode(args)?;
                json!(gateway.delete_pages(&a.urls).await?)
            }
            "delPagesByDomain" => {
                let a: DomainArgs = decode(args)?;
                json!(gateway.delete_pages_by_domain(&a.domain).await?)
            }
            "delPagesByPattern" => {
                let a: PatternArgs = decode(args)?;
                json!(gateway.delete_pages_by_pattern(&a.pattern).await?)
            }
            "getMatchingPageCount" => {
                let a: PatternArgs = decode(args)?;
                json!(gateway.matching_page_count(&a.pattern).await?)
            }
            "suggest" => {
                let req: SuggestRequest = decode(args)?;
                json!(gateway.suggest(&req).await?)
            }
            other => return Err(Error::NotFound(format!("remote function: {}", other))),
        };
        Ok(result)
    }
}
