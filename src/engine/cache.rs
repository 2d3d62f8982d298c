//! # engine::cache
//!
//! **Node Cache** — remembers, per field, the element that last located that
//! field so the next extraction can skip the selector ladder.
//!
//! An entry is a back-reference, never ownership.  A read is a hit only when
//! both hold *at read time*:
//!
//! ```text
//!   now - observed_at < ttl        (fresh)
//!   page.is_attached(node)         (still in the live tree)
//! ```
//!
//! A miss leaves the stale entry in place; the next successful lookup's `put`
//! overwrites it.

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::models::Field;
use crate::page::Page;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, Copy)]
struct CacheEntry<N> {
    node:        N,
    observed_at: Instant,
}

#[derive(Debug)]
pub struct NodeCache<N> {
    ttl:     Duration,
    entries: HashMap<Field, CacheEntry<N>>,
}

impl<N: Copy + Eq + Debug> NodeCache<N> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached node for `field`, if fresh and still attached to `page`.
    pub fn get<P>(&self, field: Field, page: &P) -> Option<N>
    where
        P: Page<Node = N>,
    {
        self.get_at(field, page, Instant::now())
    }

    pub fn get_at<P>(&self, field: Field, page: &P, now: Instant) -> Option<N>
    where
        P: Page<Node = N>,
    {
        let entry = self.entries.get(&field)?;

        if now.saturating_duration_since(entry.observed_at) >= self.ttl {
            trace!(%field, "cache miss: expired");
            return None;
        }
        if !page.is_attached(entry.node) {
            trace!(%field, "cache miss: node detached");
            return None;
        }

        trace!(%field, node = ?entry.node, "cache hit");
        Some(entry.node)
    }

    /// Store `node` for `field`, replacing any previous entry.
    pub fn put(&mut self, field: Field, node: N) {
        self.put_at(field, node, Instant::now());
    }

    pub fn put_at(&mut self, field: Field, node: N, now: Instant) {
        self.entries.insert(field, CacheEntry { node, observed_at: now });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Copy + Eq + Debug> Default for NodeCache<N> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
