//! # chartctx — Live Market-Context Extraction
//!
//! Infers what a trader is looking at — symbol, chart timeframe, leverage,
//! margin mode, open positions — by reading the structure and text of a
//! trading web page the program does not control.
//!
//! ```text
//!  ┌──────────────┐  select / text / scan   ┌──────────────────────────────┐
//!  │  Host page   │ ◀────────────────────── │ ContextEngine                │
//!  │  (impl Page) │                         │ ├─ SelectorRegistry          │
//!  └──────────────┘                         │ ├─ NodeCache (TTL + liveness)│
//!                                           │ └─ field ladders             │
//!                                           └──────────────┬───────────────┘
//!                                                          │ ContextSnapshot
//!  ┌──────────────┐  broadcast (JSON events)  ┌────────────▼───────────────┐
//!  │ Notifications│ ◀──────────────────────── │ ContextWatcher             │
//!  └──────────────┘                           └────────────────────────────┘
//! ```
//!
//! Reading never fails: a field that cannot be determined comes back as
//! `None` or its documented default.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod models;
pub mod page;
pub mod watcher;

pub use engine::{ContextEngine, ProviderTable, SelectorRegistry};
pub use error::PageError;
pub use events::ContextEvent;
pub use models::{ContextSnapshot, Field, MarginType, PositionRecord};
pub use page::{HtmlPage, Page};
pub use watcher::ContextWatcher;
