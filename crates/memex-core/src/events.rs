//! Browser bookmark events and the bus that carries them.
//!
//! The host process publishes bookmark notifications onto a
//! [`BookmarkEventBus`]; the bookmark event adapter in `memex-search`
//! subscribes and turns them into index mutations.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Descriptor of a browser bookmark tree node.
///
/// Folder nodes carry no `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BookmarkNode {
    pub fn new(id: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            id: id.into(),
            url: url.map(String::from),
            title: None,
        }
    }

    /// Folder nodes have no URL.
    pub fn is_folder(&self) -> bool {
        self.url.as_deref().map_or(true, str::is_empty)
    }
}

/// Wrapper delivered with a removal notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRemoveInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub node: BookmarkNode,
}

/// Bookmark notification from the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BookmarkEvent {
    Created { id: String, node: BookmarkNode },
    Removed { id: String, info: BookmarkRemoveInfo },
}

impl BookmarkEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            BookmarkEvent::Created { .. } => "bookmark.created",
            BookmarkEvent::Removed { .. } => "bookmark.removed",
        }
    }

    pub fn bookmark_id(&self) -> &str {
        match self {
            BookmarkEvent::Created { id, .. } | BookmarkEvent::Removed { id, .. } => id,
        }
    }
}

/// Broadcast channel for bookmark events.
///
/// Slow receivers that fall behind receive a `Lagged` error and miss events.
pub struct BookmarkEventBus {
    tx: broadcast::Sender<BookmarkEvent>,
}

impl BookmarkEventBus {
    /// Create a new bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event. With no subscribers the event is dropped.
    pub fn emit(&self, event: BookmarkEvent) {
        tracing::debug!(
            event_type = event.event_type(),
            bookmark_id = event.bookmark_id(),
            subscriber_count = self.tx.receiver_count(),
            "BookmarkEventBus emit"
        );
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BookmarkEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BookmarkEventBus {
    fn default() -> Self {
        Self::new(crate::defaults::EVENT_BUS_CAPACITY)
    }
}
