//! Bookmark event adapter.
//!
//! Turns browser bookmark notifications into bookmark store mutations.
//! Handlers never fail: gateway errors are logged and dropped so a bad
//! event cannot stop the listener.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use memex_core::{
    BookmarkEvent, BookmarkNode, BookmarkRemoveInfo, BookmarkRequest, StorageGateway, TabTracker,
};

/// Forwards bookmark events to the storage gateway.
#[derive(Clone)]
pub struct BookmarkEventAdapter {
    gateway: Arc<dyn StorageGateway>,
    tabs: Arc<dyn TabTracker>,
}

impl BookmarkEventAdapter {
    pub fn new(gateway: Arc<dyn StorageGateway>, tabs: Arc<dyn TabTracker>) -> Self {
        Self { gateway, tabs }
    }

    /// Bookmark a newly created node. Folder nodes are ignored.
    ///
    /// The active tab's id is attached only when that tab shows the node's URL.
    pub async fn on_bookmark_created(&self, id: &str, node: &BookmarkNode) {
        let Some(url) = node.url.as_deref().filter(|u| !u.is_empty()) else {
            debug!(bookmark_id = id, "Ignoring folder creation");
            return;
        };

        let tab_id = self
            .tabs
            .active_tab()
            .await
            .filter(|tab| tab.url == url)
            .map(|tab| tab.id);

        let req = BookmarkRequest {
            url: url.to_string(),
            tab_id,
        };
        match self.gateway.add_bookmark(req).await {
            Ok(()) => debug!(bookmark_id = id, page_url = url, tab_id = ?tab_id, "Bookmark added"),
            Err(e) => error!(
                bookmark_id = id,
                page_url = url,
                error = %e,
                "Failed to add bookmark"
            ),
        }
    }

    /// Remove the bookmark for a deleted node. Folder nodes are ignored.
    pub async fn on_bookmark_removed(&self, id: &str, info: &BookmarkRemoveInfo) {
        let Some(url) = info.node.url.as_deref().filter(|u| !u.is_empty()) else {
            debug!(bookmark_id = id, "Ignoring folder removal");
            return;
        };

        match self.gateway.delete_bookmark(url).await {
            Ok(()) => debug!(bookmark_id = id, page_url = url, "Bookmark deleted"),
            Err(e) => error!(
                bookmark_id = id,
                page_url = url,
                error = %e,
                "Failed to delete bookmark"
            ),
        }
    }

    pub async fn handle(&self, event: &BookmarkEvent) {
        match event {
            BookmarkEvent::Created { id, node } => self.on_bookmark_created(id, node).await,
            BookmarkEvent::Removed { id, info } => self.on_bookmark_removed(id, info).await,
        }
    }

    /// Consume events until the bus is closed.
    ///
    /// Lagged receivers log the number of skipped events and keep going.
    pub async fn listen(self, mut rx: broadcast::Receiver<BookmarkEvent>) {
        info!(subsystem = "search", component = "bookmarks", "Bookmark listener started");
        loop {
            match rx.recv().await {
                Ok(event) => self.handle(&event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Bookmark listener lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        info!(subsystem = "search", component = "bookmarks", "Bookmark listener stopped");
    }

    /// Spawn [`listen`](Self::listen) on the current tokio runtime.
    pub fn spawn(self, rx: broadcast::Receiver<BookmarkEvent>) -> JoinHandle<()> {
        tokio::spawn(self.listen(rx))
    }
}
