//! # page
//!
//! The capabilities the engine borrows from its hosting environment.
//!
//! The engine never owns page elements.  A [`Page::Node`] is a back-reference
//! the page resolves on every read, so a node the host has since removed reads
//! as "nothing" instead of handing back stale text.
//!
//! ```text
//!  ┌───────────────┐  select_first / select_all   ┌──────────────┐
//!  │ ContextEngine │ ───────────────────────────▶ │  impl Page   │
//!  │               │  text / attribute / scan     │  (host tree) │
//!  │  NodeCache ───┼── is_attached(node) ───────▶ │              │
//!  └───────────────┘  location_path / title       └──────────────┘
//! ```

pub mod html;

use std::fmt::Debug;

use crate::error::PageResult;

pub use html::{HtmlNode, HtmlPage};

/// Read-only view of the live page.
pub trait Page {
    /// Opaque element handle.  Must not keep the element alive.
    type Node: Copy + Eq + Debug;

    /// First element matching `query` in document order.
    fn select_first(&self, query: &str) -> PageResult<Option<Self::Node>>;

    /// Every element matching `query`, in document order.
    fn select_all(&self, query: &str) -> PageResult<Vec<Self::Node>>;

    /// Concatenated text content of `node`; `None` once the node is gone.
    fn text(&self, node: Self::Node) -> Option<String>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// Trimmed, non-empty text leaves under `root`, in document order.
    fn text_nodes(&self, root: Self::Node) -> Vec<String>;

    /// Whether `node` is still part of the live document.
    fn is_attached(&self, node: Self::Node) -> bool;

    /// Whether `node` sits strictly below `ancestor` in the same document.
    fn is_descendant(&self, node: Self::Node, ancestor: Self::Node) -> bool;

    /// Path component of the current URL, e.g. `/en/futures/BTCUSDT`.
    fn location_path(&self) -> String;

    fn title(&self) -> String;
}
