//! # engine
//!
//! The market-context extraction engine.  Data flows one way:
//!
//! ```text
//!  SelectorRegistry ──▶ NodeCache ──▶ field extractors ──▶ ContextEngine ──▶ ContextSnapshot
//!   (what to query)     (last hit)    (strategy ladders)    (assembly)
//! ```

pub mod assembler;
pub mod cache;
pub(crate) mod extract;
pub(crate) mod patterns;
pub mod registry;

pub use assembler::ContextEngine;
pub use cache::{NodeCache, DEFAULT_TTL};
pub use registry::{ProviderTable, SelectorRegistry};
