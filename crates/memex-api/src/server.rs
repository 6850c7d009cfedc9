//! JSON-lines request loop.
//!
//! Each input line is one request:
//! `{"id": 1, "method": "searchPages", "args": {...}}`.
//! Each output line is the matching response, carrying either `result` or
//! `error`. Besides the remote functions the host accepts two methods of its
//! own: `bookmarkEvent` publishes a browser bookmark event onto the bus, and
//! `setActiveTab` updates the tab the bookmark adapter consults.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use memex_core::{ActiveTab, BookmarkEvent, BookmarkEventBus, Error, TabTracker};
use memex_search::RemoteFunctions;

/// Active tab as reported by the host.
#[derive(Debug, Default)]
pub struct HostTabs {
    active: RwLock<Option<ActiveTab>>,
}

impl HostTabs {
    pub async fn set_active(&self, tab: Option<ActiveTab>) {
        *self.active.write().await = tab;
    }
}

#[async_trait]
impl TabTracker for HostTabs {
    async fn active_tab(&self) -> Option<ActiveTab> {
        self.active.read().await.clone()
    }
}

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

impl Response {
    fn ok(id: Value, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Value, error: &Error) -> Self {
        Self {
            id,
            result: None,
            error: Some(ErrorBody {
                kind: error_kind(error),
                message: error.to_string(),
            }),
        }
    }
}

/// Stable machine-readable name for an error.
fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::BadTerm => "bad_term",
        Error::InvalidSearch => "invalid_search",
        Error::NotFound(_) => "not_found",
        Error::InvalidInput(_) => "invalid_input",
        Error::Storage(_) => "storage",
        Error::Serialization(_) => "serialization",
        Error::Config(_) => "config",
        Error::Internal(_) => "internal",
    }
}

/// Serves remote functions and host methods over a line-oriented stream.
pub struct Server {
    remote: RemoteFunctions,
    bus: BookmarkEventBus,
    tabs: Arc<HostTabs>,
}

impl Server {
    pub fn new(remote: RemoteFunctions, bus: BookmarkEventBus, tabs: Arc<HostTabs>) -> Self {
        Self { remote, bus, tabs }
    }

    /// Read requests until EOF, writing one response line per request.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut served = 0usize;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line).await;
            writer.write_all(response.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
            served += 1;
        }
        info!(served, "Input closed");
        Ok(())
    }

    /// Handle one request line and return the serialized response.
    pub async fn handle_line(&self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(req) => {
                let request_id = Uuid::now_v7();
                let span = info_span!("request", request_id = %request_id, method = %req.method);
                self.handle(req).instrument(span).await
            }
            Err(e) => {
                warn!(error = %e, "Malformed request");
                Response::err(Value::Null, &Error::from(e))
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"id":null,"error":{{"kind":"internal","message":"{}"}}}}"#,
                e.to_string().replace('"', "'")
            )
        })
    }

    async fn handle(&self, req: Request) -> Response {
        let start = Instant::now();
        let outcome = match req.method.as_str() {
            "bookmarkEvent" => self.publish_bookmark_event(req.args),
            "setActiveTab" => self.set_active_tab(req.args).await,
            method => self.remote.call(method, req.args).await,
        };

        let success = outcome.is_ok();
        debug!(
            success,
            duration_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
        match outcome {
            Ok(result) => Response::ok(req.id, result),
            Err(e) => {
                warn!(error = %e, "Request failed");
                Response::err(req.id, &e)
            }
        }
    }

    fn publish_bookmark_event(&self, args: Value) -> memex_core::Result<Value> {
        let event: BookmarkEvent = serde_json::from_value(args)?;
        self.bus.emit(event);
        Ok(Value::Null)
    }

    async fn set_active_tab(&self, args: Value) -> memex_core::Result<Value> {
        let tab: Option<ActiveTab> = serde_json::from_value(args)?;
        self.tabs.set_active(tab).await;
        Ok(Value::Null)
    }
}
