//! # engine::patterns
//!
//! Text heuristics shared by the field extractors.  Every function here is
//! pure: `&str` in, validated value or `None` out.  Regexes compile once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{MarginType, PositionRecord, MAX_LEVERAGE, MIN_LEVERAGE};

// `[0-9]` rather than `\d`: the regex crate's `\d` is Unicode-wide.

/// Leading symbol of a dedicated symbol display, e.g. `BTCUSDT Perpetual`.
/// Needs at least one letter so a price heading is never read as a symbol.
static SYMBOL_DISPLAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]*[A-Z][A-Z0-9]*)\b").expect("valid regex"));

/// Symbol with an explicit quote suffix, anywhere in free text.
static QUOTED_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z0-9]+(?:USDT|USD))\b").expect("valid regex"));

/// `/futures/<SYMBOL>` path segment.
static FUTURES_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/futures/([a-z0-9]+)(?:[/?#]|$)").expect("valid regex"));

static TIMEFRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+[mhdw]$").expect("valid regex"));

/// Digits immediately before a trailing `x`, e.g. `Leverage 20x`.
static LEVERAGE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)[xX]$").expect("valid regex"));

/// A whole token that is nothing but a leverage, e.g. `20x`.
static LEVERAGE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]{1,3})[xX]$").expect("valid regex"));

/// Amount followed by a currency/unit, e.g. `0.500 BTC`, `-1,200 ETH`.
static POSITION_SIZE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(-?[0-9][0-9,]*(?:\.[0-9]+)?)\s+([A-Z]{2,10})\b").expect("valid regex")
});

/// Signed number, optional percent, then a PNL label, e.g. `+12.50% PNL`.
static POSITION_PNL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+-]?[0-9][0-9,]*(?:\.[0-9]+)?%?)\s*\(?(?i:pnl)").expect("valid regex")
});

// ─── Symbol ───────────────────────────────────────────────────────────────────

pub fn symbol_from_display(text: &str) -> Option<String> {
    SYMBOL_DISPLAY
        .captures(text.trim())
        .map(|c| c[1].to_string())
}

pub fn symbol_from_path(path: &str) -> Option<String> {
    FUTURES_PATH
        .captures(path)
        .map(|c| c[1].to_ascii_uppercase())
}

pub fn symbol_from_title(title: &str) -> Option<String> {
    QUOTED_SYMBOL.captures(title).map(|c| c[1].to_string())
}

// ─── Timeframe ────────────────────────────────────────────────────────────────

pub fn timeframe(text: &str) -> Option<String> {
    let text = text.trim();
    TIMEFRAME.is_match(text).then(|| text.to_string())
}

// ─── Leverage ─────────────────────────────────────────────────────────────────

fn bounded_leverage(digits: &str) -> Option<u32> {
    digits
        .parse::<u32>()
        .ok()
        .filter(|l| (MIN_LEVERAGE..=MAX_LEVERAGE).contains(l))
}

/// Leverage from a labelled display: digits before a trailing `x`.
pub fn leverage_suffix(text: &str) -> Option<u32> {
    LEVERAGE_SUFFIX
        .captures(text.trim())
        .and_then(|c| bounded_leverage(&c[1]))
}

/// Leverage from text that must consist of the token alone.
pub fn leverage_token(text: &str) -> Option<u32> {
    LEVERAGE_TOKEN
        .captures(text.trim())
        .and_then(|c| bounded_leverage(&c[1]))
}

// ─── Margin type ──────────────────────────────────────────────────────────────

pub fn margin_type(text: &str) -> Option<MarginType> {
    let lower = text.to_lowercase();
    if lower.contains("cross") {
        Some(MarginType::Cross)
    } else if lower.contains("isolated") {
        Some(MarginType::Isolated)
    } else {
        None
    }
}

// ─── Positions ────────────────────────────────────────────────────────────────

/// Parse one position row.  `None` unless a symbol is present.
pub fn position_row(text: &str) -> Option<PositionRecord> {
    let symbol = QUOTED_SYMBOL.captures(text)?[1].to_string();

    let size = POSITION_SIZE
        .captures_iter(text)
        .find(|c| !c[2].eq_ignore_ascii_case("PNL"))
        .and_then(|c| c[1].replace(',', "").parse::<f64>().ok());

    let pnl = POSITION_PNL.captures(text).map(|c| c[1].to_string());

    Some(PositionRecord { symbol, size, pnl })
}
