//! # chartctx — host binary
//!
//! Reads a saved trading page, runs the context engine over it and, in watch
//! mode, re-polls on an interval while the file is rewritten underneath it.
//!
//! ```text
//!  page.html ──(mtime changed?)──▶ HtmlPage::load ──▶ ContextWatcher::poll
//!                                                          │
//!                                   notification task ◀────┘ broadcast
//! ```
//!
//! See [`chartctx::config`] for the environment variables.

use std::path::Path;
use std::time::SystemTime;

use anyhow::Context;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chartctx::config::Config;
use chartctx::{ContextEngine, ContextWatcher, HtmlPage};

/// Buffered events per subscriber before it starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("chartctx=info".parse()?))
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════╗
  ║        CHARTCTX — Market Context Engine       ║
  ║   symbol · timeframe · leverage · positions   ║
  ╚═══════════════════════════════════════════════╝"#);

    // ── 3. Config + engine ────────────────────────────────────────────────────
    let config = Config::from_env().context("Failed to load config")?;
    let registry = config.registry()?;

    let html = std::fs::read_to_string(&config.page_html_path)
        .with_context(|| format!("Failed to read {}", config.page_html_path.display()))?;
    let page = HtmlPage::parse(&html)
        .with_location(config.page_path.clone(), config.page_title.clone());

    let engine = ContextEngine::with_ttl(page, registry, config.cache_ttl);

    info!(
        provider = %engine.registry().table().provider,
        page     = %config.page_html_path.display(),
        ttl      = ?engine.cache_ttl(),
        "Engine ready"
    );
    let mut watcher = ContextWatcher::new(engine, EVENT_CHANNEL_CAPACITY);

    // ── 4a. One-shot ──────────────────────────────────────────────────────────
    if !config.watch {
        let snapshot = watcher.poll();
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    // ── 4b. Notification sink ─────────────────────────────────────────────────
    let mut rx = watcher.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(json) => info!(event = %json, "📣 context event"),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Notification sink lagging"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // ── 5. Watch loop ─────────────────────────────────────────────────────────
    let mut last_modified = modified_at(&config.page_html_path);
    let mut ticker = tokio::time::interval(config.poll_interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(interval = ?config.poll_interval, "👀 Watching page");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                reload_if_changed(&config.page_html_path, &mut last_modified, &mut watcher);
                let snapshot = watcher.poll();
                debug!(summary = %snapshot.summary(), "poll");
            }
            _ = &mut shutdown => {
                info!("Ctrl-C received — stopping");
                break;
            }
        }
    }

    Ok(())
}

fn modified_at(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Re-parse the page file when its mtime moved.  A failed read keeps the
/// current document; the next tick tries again.
fn reload_if_changed(
    path: &Path,
    last_modified: &mut Option<SystemTime>,
    watcher: &mut ContextWatcher<HtmlPage>,
) {
    let modified = modified_at(path);
    if modified == *last_modified {
        return;
    }

    match std::fs::read_to_string(path) {
        Ok(html) => {
            let page = watcher.engine_mut().page_mut();
            page.load(&html);
            *last_modified = modified;
            info!(generation = page.generation(), "🔄 Page reloaded");
        }
        Err(e) => warn!(error = %e, path = %path.display(), "Page reload failed"),
    }
}
