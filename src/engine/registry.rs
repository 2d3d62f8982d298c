//! # engine::registry
//!
//! **Selector Registry** — per field, the ordered candidate queries that might
//! locate the element carrying that field on a given host platform.
//!
//! Pure data.  Order is precedence: the first selector that matches wins.
//! Supporting another platform means adding another [`ProviderTable`] (built
//! in, or loaded from JSON) — the extractors never change.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::models::Field;

// ─── ProviderTable ────────────────────────────────────────────────────────────

/// Everything platform-specific the engine needs to know about one host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderTable {
    pub provider: String,
    /// Static snapshot metadata.
    pub exchange: String,
    pub market:   String,
    pub contract: String,

    /// Dedicated-element selectors per field.  For [`Field::Positions`] these
    /// are the position-row selectors.
    #[serde(default)]
    pub fields: HashMap<Field, Vec<String>>,

    /// Chart interval buttons; one of them carries an active marker.
    #[serde(default)]
    pub interval_buttons: Vec<String>,

    /// Every button-like element (leverage tier 2 scan).
    #[serde(default)]
    pub buttons: Vec<String>,

    /// Coarse selectors for the order-entry panel (leverage tier 3 scope).
    #[serde(default)]
    pub order_entry: Vec<String>,
}

impl ProviderTable {
    /// Built-in table for the Binance USDⓈ-M futures trading page.
    pub fn binance_futures() -> Self {
        fn list(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        let fields = HashMap::from([
            (Field::Symbol, list(&[
                "[data-testid='contract-symbol']",
                ".contract-symbol",
                ".symbol-title h1",
                "h1",
            ])),
            (Field::Timeframe, list(&[
                "[data-testid='active-interval']",
                ".chart-interval .interval-item.active",
                ".chart-interval [aria-selected='true']",
            ])),
            (Field::Leverage, list(&[
                "[data-testid='leverage-display']",
                ".leverage-btn",
                ".order-form .leverage",
            ])),
            (Field::MarginType, list(&[
                "[data-testid='margin-mode']",
                ".margin-type-btn",
                ".margin-mode",
            ])),
            (Field::Positions, list(&[
                "[data-testid='position-row']",
                ".position-table tbody tr",
                ".positions-list .position-item",
            ])),
        ]);

        Self {
            provider:         "binance".to_string(),
            exchange:         "Binance".to_string(),
            market:           "futures".to_string(),
            contract:         "perpetual".to_string(),
            fields,
            interval_buttons: list(&[
                "[data-testid='interval-button']",
                ".interval-item",
                "button[data-interval]",
            ]),
            buttons:          list(&["button", "[role='button']"]),
            order_entry:      list(&[
                "[data-testid='order-form']",
                ".order-form",
                "#orderForm",
            ]),
        }
    }
}

// ─── SelectorRegistry ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SelectorRegistry {
    table: ProviderTable,
}

impl SelectorRegistry {
    pub fn new(table: ProviderTable) -> Self {
        Self { table }
    }

    pub fn binance_futures() -> Self {
        Self::new(ProviderTable::binance_futures())
    }

    /// Parse a provider table from JSON text.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let table: ProviderTable =
            serde_json::from_str(json).context("Invalid provider table JSON")?;
        Ok(Self::new(table))
    }

    /// Load a provider table from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider table {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Ordered selectors for `field`; empty when the provider has none.
    pub fn strategies(&self, field: Field) -> &[String] {
        self.table.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn interval_buttons(&self) -> &[String] {
        &self.table.interval_buttons
    }

    pub fn buttons(&self) -> &[String] {
        &self.table.buttons
    }

    pub fn order_entry(&self) -> &[String] {
        &self.table.order_entry
    }

    pub fn table(&self) -> &ProviderTable {
        &self.table
    }
}

impl Default for SelectorRegistry {
    fn default() -> Self {
        Self::binance_futures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_every_field() {
        let registry = SelectorRegistry::binance_futures();
        for field in Field::ALL {
            assert!(!registry.strategies(field).is_empty(), "{field} has no selectors");
        }
        assert_eq!(registry.table().exchange, "Binance");
    }

    #[test]
    fn unknown_field_yields_empty_list() {
        let registry = SelectorRegistry::from_json(
            r#"{
                "provider": "bybit",
                "exchange": "Bybit",
                "market":   "derivatives",
                "contract": "perpetual",
                "fields":   { "symbol": [".symbol-name", "h1"] }
            }"#,
        )
        .unwrap();

        assert_eq!(registry.strategies(Field::Symbol), [".symbol-name", "h1"]);
        assert!(registry.strategies(Field::Leverage).is_empty());
        assert!(registry.order_entry().is_empty());
    }

    #[test]
    fn table_round_trips_through_json() {
        let table = ProviderTable::binance_futures();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(SelectorRegistry::from_json(&json).unwrap().table(), &table);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(SelectorRegistry::from_json("{ not json").is_err());
    }
}
