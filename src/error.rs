//! # error
//!
//! Error type for the page capability layer.
//!
//! Nothing here ever reaches a caller of the engine: every extractor step
//! catches a [`PageError`] at the point it occurs and treats it as "this
//! strategy produced nothing". The type exists so the host page can say *why*
//! a query failed, which is what the `debug!` lines in the extractors print.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// The structural query could not be parsed (unsupported or malformed
    /// selector syntax).
    #[error("Invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

pub type PageResult<T> = Result<T, PageError>;
