//! # models::context
//!
//! The value types the engine hands to its callers.
//!
//! [`ContextSnapshot`] is built once per extraction cycle and never mutated
//! afterwards.  Every field is always present — a value that could not be read
//! from the page is `None` or a documented default, never a missing key.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timeframe reported when no page element yields a valid interval.
pub const DEFAULT_TIMEFRAME: &str = "1h";

/// Inclusive leverage bounds accepted from page text.
pub const MIN_LEVERAGE: u32 = 1;
pub const MAX_LEVERAGE: u32 = 125;

// ─── MarginType ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginType {
    #[default]
    Cross,
    Isolated,
}

impl MarginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginType::Cross    => "cross",
            MarginType::Isolated => "isolated",
        }
    }
}

impl fmt::Display for MarginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── PositionRecord ───────────────────────────────────────────────────────────

/// One row of the page's open-positions table.
///
/// Only emitted when a symbol could be read from the row; `size` and `pnl`
/// are independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub symbol: String,
    /// Position amount in contract units (sign preserved for shorts).
    pub size: Option<f64>,
    /// PnL token exactly as displayed, e.g. `"+12.50"` or `"-3.1%"`.
    pub pnl: Option<String>,
}

// ─── ContextSnapshot ──────────────────────────────────────────────────────────

/// Immutable, timestamped aggregate of every field read in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// e.g. `"BTCUSDT"`; `None` when no strategy found a symbol.
    pub symbol: Option<String>,
    /// Always matches `^\d+[mhdw]$`; defaults to `"1h"`.
    pub timeframe: String,
    /// Within `1..=125` when present.
    pub leverage: Option<u32>,
    pub margin_type: MarginType,
    pub positions: Vec<PositionRecord>,
    pub exchange: String,
    pub market: String,
    pub contract: String,
    pub timestamp: DateTime<Utc>,
}

impl ContextSnapshot {
    /// One-line human summary, e.g. `BTCUSDT · 4h · 20x · isolated · 2 positions`.
    ///
    /// Used by popup/notification consumers that only need a glanceable line.
    pub fn summary(&self) -> String {
        let symbol = self.symbol.as_deref().unwrap_or("—");
        let leverage = self
            .leverage
            .map(|l| format!("{l}x"))
            .unwrap_or_else(|| "?x".to_string());
        let positions = match self.positions.len() {
            1 => "1 position".to_string(),
            n => format!("{n} positions"),
        };

        format!(
            "{symbol} · {tf} · {leverage} · {margin} · {positions}",
            tf     = self.timeframe,
            margin = self.margin_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ContextSnapshot {
        ContextSnapshot {
            symbol:      Some("BTCUSDT".into()),
            timeframe:   "4h".into(),
            leverage:    Some(20),
            margin_type: MarginType::Isolated,
            positions:   vec![PositionRecord { symbol: "BTCUSDT".into(), size: Some(0.5), pnl: None }],
            exchange:    "Binance".into(),
            market:      "futures".into(),
            contract:    "perpetual".into(),
            timestamp:   Utc::now(),
        }
    }

    #[test]
    fn summary_line() {
        assert_eq!(snapshot().summary(), "BTCUSDT · 4h · 20x · isolated · 1 position");
    }

    #[test]
    fn summary_with_missing_values() {
        let mut s = snapshot();
        s.symbol = None;
        s.leverage = None;
        s.positions.clear();
        assert_eq!(s.summary(), "— · 4h · ?x · isolated · 0 positions");
    }

    #[test]
    fn margin_type_serializes_lowercase() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["margin_type"], "isolated");
        assert_eq!(json["leverage"], 20);
    }
}
