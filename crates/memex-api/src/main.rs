//! memex host process.
//!
//! Serves the memex remote functions as JSON lines on stdin/stdout over the
//! in-memory database. Logs go to stderr.

mod server;

use std::sync::Arc;

use anyhow::Context;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memex_core::{BookmarkEventBus, SearchConfig, StorageGateway};
use memex_db::Database;
use memex_search::{BookmarkEventAdapter, RemoteFunctions, SearchCoordinator};

use server::{HostTabs, Server};

fn init_logging() -> String {
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "memex=info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "memex_api=info,memex_search=info,memex_db=info,memex_core=info".into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout carries responses, so every layer writes to stderr.
    if log_format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if let Some(ansi) = log_ansi {
            layer = layer.with_ansi(ansi);
        }
        registry.with(layer).init();
    }
    log_format
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_format = init_logging();
    info!(log_format = %log_format, "Logging initialized");

    let config = SearchConfig::from_env().context("invalid search configuration")?;
    info!(
        default_limit = config.default_limit,
        max_annots_per_page = config.max_annots_per_page,
        min_term_length = config.min_term_length,
        "Configuration loaded"
    );

    let gateway: Arc<dyn StorageGateway> = Arc::new(Database::new());
    let tabs = Arc::new(HostTabs::default());

    let bus = BookmarkEventBus::new(config.event_bus_capacity);
    let listener = BookmarkEventAdapter::new(gateway.clone(), tabs.clone()).spawn(bus.subscribe());

    let remote = RemoteFunctions::new(SearchCoordinator::with_config(gateway, &config));
    let server = Server::new(remote, bus, tabs);

    info!("Serving requests on stdin");
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("request stream failed")?;

    // Dropping the server closes the bus and stops the listener.
    drop(server);
    listener.await.context("bookmark listener panicked")?;

    info!("Shutdown complete");
    Ok(())
}
