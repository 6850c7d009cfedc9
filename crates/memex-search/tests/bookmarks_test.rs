//! Integration tests for the bookmark event adapter.

mod helpers;

use std::sync::Arc;

use helpers::{FixedTab, MockGateway};
use memex_search::{
    BookmarkEvent, BookmarkEventAdapter, BookmarkEventBus, BookmarkNode, BookmarkRemoveInfo,
    NoActiveTab,
};

fn adapter(gateway: &MockGateway, tabs: FixedTab) -> BookmarkEventAdapter {
    BookmarkEventAdapter::new(Arc::new(gateway.clone()), Arc::new(tabs))
}

fn removal(url: Option<&str>) -> BookmarkRemoveInfo {
    BookmarkRemoveInfo {
        parent_id: Some("0".to_string()),
        node: BookmarkNode::new("7", url),
    }
}

#[tokio::test]
async fn test_folder_events_make_no_calls() {
    let gateway = MockGateway::new();
    let adapter = adapter(&gateway, FixedTab::showing(1, "http://bla.com"));

    adapter.on_bookmark_created("7", &BookmarkNode::new("7", None)).await;
    adapter.on_bookmark_created("7", &BookmarkNode::new("7", Some(""))).await;
    adapter.on_bookmark_removed("7", &removal(None)).await;

    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn test_created_attaches_matching_tab() {
    let gateway = MockGateway::new();
    let adapter = adapter(&gateway, FixedTab::showing(42, "http://bla.com/page"));

    adapter
        .on_bookmark_created("1", &BookmarkNode::new("1", Some("http://bla.com/page")))
        .await;

    let calls = gateway.calls_to("add_bookmark");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].input, "http://bla.com/page");
    assert_eq!(calls[0].tab_id, Some(42));
}

#[tokio::test]
async fn test_created_without_matching_tab() {
    for tabs in [FixedTab::showing(42, "http://other.com"), FixedTab::default()] {
        let gateway = MockGateway::new();
        adapter(&gateway, tabs)
            .on_bookmark_created("1", &BookmarkNode::new("1", Some("http://bla.com/page")))
            .await;

        let calls = gateway.calls_to("add_bookmark");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tab_id, None);
    }
}

#[tokio::test]
async fn test_removed_deletes_bookmark() {
    let gateway = MockGateway::new();
    adapter(&gateway, FixedTab::default())
        .on_bookmark_removed("7", &removal(Some("http://bla.com")))
        .await;

    let calls = gateway.calls_to("delete_bookmark");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].input, "http://bla.com");
}

#[tokio::test]
async fn test_gateway_failures_are_swallowed() {
    let gateway = MockGateway::new().failing("store locked");
    let adapter = adapter(&gateway, FixedTab::default());

    adapter
        .on_bookmark_created("1", &BookmarkNode::new("1", Some("http://bla.com")))
        .await;
    adapter.on_bookmark_removed("1", &removal(Some("http://bla.com"))).await;

    assert_eq!(gateway.call_count(), 2);
}

#[tokio::test]
async fn test_listener_drains_bus_until_closed() {
    let gateway = MockGateway::new();
    let bus = BookmarkEventBus::new(8);
    let handle = BookmarkEventAdapter::new(Arc::new(gateway.clone()), Arc::new(NoActiveTab))
        .spawn(bus.subscribe());

    bus.emit(BookmarkEvent::Created {
        id: "1".to_string(),
        node: BookmarkNode::new("1", Some("http://bla.com")),
    });
    bus.emit(BookmarkEvent::Removed {
        id: "2".to_string(),
        info: removal(Some("http://old.com")),
    });
    drop(bus);

    handle.await.expect("Listener panicked");

    let ops: Vec<_> = gateway.get_calls().into_iter().map(|c| c.operation).collect();
    assert_eq!(ops, vec!["add_bookmark", "delete_bookmark"]);
}
