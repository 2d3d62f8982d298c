//! # models::field
//!
//! [`Field`] — the closed set of semantic values the engine extracts from the
//! page.  Used as the key of both the selector registry and the node cache.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Timeframe,
    Leverage,
    MarginType,
    Positions,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Symbol,
        Field::Timeframe,
        Field::Leverage,
        Field::MarginType,
        Field::Positions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Symbol     => "symbol",
            Field::Timeframe  => "timeframe",
            Field::Leverage   => "leverage",
            Field::MarginType => "margin_type",
            Field::Positions  => "positions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
