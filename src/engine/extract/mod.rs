//! # engine::extract
//!
//! **Field Extractors** — one module per field, each an ordered ladder of
//! strategies evaluated left to right until one yields a value.
//!
//! ```text
//!   Strategy = fn(&mut Scan) -> Option<T>
//!
//!   [cheap, specific] ──miss──▶ [broader] ──miss──▶ [bounded scan] ──miss──▶ default / None
//!         │ hit                     │ hit                  │ hit
//!         ▼                         ▼                      ▼
//!       value                     value                  value
//! ```
//!
//! A strategy never fails outward: a bad selector, a missing element or
//! unparsable text all mean "no value", and the ladder moves on.

pub(crate) mod leverage;
pub(crate) mod margin;
pub(crate) mod positions;
pub(crate) mod symbol;
pub(crate) mod timeframe;

use std::fmt::Debug;

use tracing::{debug, trace};

use crate::engine::cache::NodeCache;
use crate::engine::registry::SelectorRegistry;
use crate::models::Field;
use crate::page::Page;

/// One rung of a ladder.
pub(crate) type Strategy<P, T> = fn(&mut Scan<'_, P>) -> Option<T>;

// ─── Scan ─────────────────────────────────────────────────────────────────────

/// Everything a strategy may touch during one extraction.
pub(crate) struct Scan<'a, P: Page> {
    pub page:     &'a P,
    pub registry: &'a SelectorRegistry,
    pub cache:    &'a mut NodeCache<P::Node>,
}

impl<'a, P: Page> Scan<'a, P> {
    pub fn new(
        page: &'a P,
        registry: &'a SelectorRegistry,
        cache: &'a mut NodeCache<P::Node>,
    ) -> Self {
        Self { page, registry, cache }
    }

    /// The dedicated element for `field`: cached node if still valid,
    /// otherwise the first registry selector that matches (then cached).
    pub fn locate(&mut self, field: Field) -> Option<P::Node> {
        if let Some(node) = self.cache.get(field, self.page) {
            return Some(node);
        }

        let node = self.first_match(self.registry.strategies(field))?;
        self.cache.put(field, node);
        Some(node)
    }

    /// First element matched by any of `selectors`, in list order.  Uncached.
    pub fn first_match(&self, selectors: &[String]) -> Option<P::Node> {
        selectors.iter().find_map(|sel| match self.page.select_first(sel) {
            Ok(found) => found,
            Err(e) => {
                debug!(error = %e, "skipping selector");
                None
            }
        })
    }

    /// Every element matched by any of `selectors`, de-duplicated, list
    /// order then document order.
    pub fn select_each(&self, selectors: &[String]) -> Vec<P::Node> {
        let mut nodes: Vec<P::Node> = Vec::new();
        for sel in selectors {
            match self.page.select_all(sel) {
                Ok(found) => {
                    for node in found {
                        if !nodes.contains(&node) {
                            nodes.push(node);
                        }
                    }
                }
                Err(e) => debug!(error = %e, "skipping selector"),
            }
        }
        nodes
    }

    pub fn text(&self, node: P::Node) -> Option<String> {
        self.page.text(node)
    }
}

// ─── Ladder ───────────────────────────────────────────────────────────────────

/// Run `ladder` in order, short-circuiting on the first value.
pub(crate) fn run_ladder<P, T>(
    field: Field,
    scan: &mut Scan<'_, P>,
    ladder: &[(&'static str, Strategy<P, T>)],
) -> Option<T>
where
    P: Page,
    T: Debug,
{
    for &(name, strategy) in ladder {
        if let Some(value) = strategy(scan) {
            trace!(%field, strategy = name, ?value, "strategy hit");
            return Some(value);
        }
        trace!(%field, strategy = name, "strategy miss");
    }

    debug!(%field, "no strategy produced a value");
    None
}
