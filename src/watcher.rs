//! # watcher
//!
//! [`ContextWatcher`] — drives a [`ContextEngine`] on the host's cadence and
//! tells subscribers what changed.
//!
//! ```text
//!   poll()
//!     ├─ extract_context()
//!     ├─ symbol switched?  → clear_cache() + extract again
//!     ├─ diff vs. last snapshot → broadcast XXX_CHANGED events
//!     └─ broadcast SNAPSHOT
//! ```
//!
//! The re-extract after a switch guarantees no field in the published
//! snapshot was read through a node cached under the previous symbol.

use tokio::sync::broadcast;
use tracing::info;

use crate::engine::ContextEngine;
use crate::events::ContextEvent;
use crate::models::ContextSnapshot;
use crate::page::Page;

pub struct ContextWatcher<P: Page> {
    engine:   ContextEngine<P>,
    last:     Option<ContextSnapshot>,
    tx:       broadcast::Sender<String>,
    switches: u64,
}

impl<P: Page> ContextWatcher<P> {
    pub fn new(engine: ContextEngine<P>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { engine, last: None, tx, switches: 0 }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    /// Run one extraction cycle and publish its events.
    pub fn poll(&mut self) -> ContextSnapshot {
        let mut snapshot = self.engine.extract_context();

        let previous = self.last.as_ref().and_then(|s| s.symbol.as_deref());
        if let Some(previous) = previous {
            if snapshot.symbol.as_deref() != Some(previous) {
                info!(
                    from = previous,
                    to   = ?snapshot.symbol,
                    "🔀 symbol switch — re-reading page with a cold cache"
                );
                self.switches += 1;
                self.engine.clear_cache();
                snapshot = self.engine.extract_context();
            }
        }

        for event in ContextEvent::diff(self.last.as_ref(), &snapshot) {
            self.broadcast(&event);
        }
        self.broadcast(&ContextEvent::Snapshot { context: Box::new(snapshot.clone()) });

        self.last = Some(snapshot.clone());
        snapshot
    }

    /// Most recent snapshot published by [`ContextWatcher::poll`].
    pub fn last(&self) -> Option<&ContextSnapshot> {
        self.last.as_ref()
    }

    /// How many symbol switches forced a cache clear so far.
    pub fn switches(&self) -> u64 {
        self.switches
    }

    pub fn engine(&self) -> &ContextEngine<P> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ContextEngine<P> {
        &mut self.engine
    }

    /// No-op when nobody is subscribed (headless mode).
    fn broadcast(&self, event: &ContextEvent) {
        let _ = self.tx.send(event.to_json());
    }
}
