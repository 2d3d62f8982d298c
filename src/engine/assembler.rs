//! # engine::assembler
//!
//! **Context Engine** — runs every field extractor once and stamps the
//! results, plus the provider's static metadata, into one [`ContextSnapshot`].
//!
//! The engine owns the page handle, the selector registry and the node cache.
//! It holds no other state: each `extract_context` call is a complete,
//! independent read of the page.  Construct one per hosted page and pass it to
//! whoever needs context; there is no global instance.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use crate::engine::cache::{NodeCache, DEFAULT_TTL};
use crate::engine::extract::{self, Scan};
use crate::engine::registry::SelectorRegistry;
use crate::models::{ContextSnapshot, MarginType, PositionRecord};
use crate::page::Page;

pub struct ContextEngine<P: Page> {
    page:     P,
    registry: SelectorRegistry,
    cache:    NodeCache<P::Node>,
}

impl<P: Page> ContextEngine<P> {
    pub fn new(page: P, registry: SelectorRegistry) -> Self {
        Self::with_ttl(page, registry, DEFAULT_TTL)
    }

    pub fn with_ttl(page: P, registry: SelectorRegistry, ttl: Duration) -> Self {
        Self { page, registry, cache: NodeCache::new(ttl) }
    }

    // ─── Extract Now ──────────────────────────────────────────────────────────

    /// Read every field from the page into a fresh snapshot.
    pub fn extract_context(&mut self) -> ContextSnapshot {
        let mut scan = Scan::new(&self.page, &self.registry, &mut self.cache);

        let symbol      = extract::symbol::extract(&mut scan);
        let timeframe   = extract::timeframe::extract(&mut scan);
        let leverage    = extract::leverage::extract(&mut scan);
        let margin_type = extract::margin::extract(&mut scan);
        let positions   = extract::positions::extract(&mut scan);

        let table = self.registry.table();
        let snapshot = ContextSnapshot {
            symbol,
            timeframe,
            leverage,
            margin_type,
            positions,
            exchange:  table.exchange.clone(),
            market:    table.market.clone(),
            contract:  table.contract.clone(),
            timestamp: Utc::now(),
        };

        debug!(
            symbol    = ?snapshot.symbol,
            timeframe = %snapshot.timeframe,
            leverage  = ?snapshot.leverage,
            margin    = %snapshot.margin_type,
            positions = snapshot.positions.len(),
            "context extracted"
        );
        snapshot
    }

    /// Drop every cached node.  Call when the page context is known to have
    /// changed (e.g. a symbol switch).
    pub fn clear_cache(&mut self) {
        let dropped = self.cache.len();
        self.cache.clear();
        info!(dropped, "🧹 node cache cleared");
    }

    // ─── Per-field ────────────────────────────────────────────────────────────

    pub fn extract_symbol(&mut self) -> Option<String> {
        extract::symbol::extract(&mut Scan::new(&self.page, &self.registry, &mut self.cache))
    }

    pub fn extract_timeframe(&mut self) -> String {
        extract::timeframe::extract(&mut Scan::new(&self.page, &self.registry, &mut self.cache))
    }

    pub fn extract_leverage(&mut self) -> Option<u32> {
        extract::leverage::extract(&mut Scan::new(&self.page, &self.registry, &mut self.cache))
    }

    pub fn extract_margin_type(&mut self) -> MarginType {
        extract::margin::extract(&mut Scan::new(&self.page, &self.registry, &mut self.cache))
    }

    pub fn extract_positions(&mut self) -> Vec<PositionRecord> {
        extract::positions::extract(&mut Scan::new(&self.page, &self.registry, &mut self.cache))
    }

    // ─── Accessors ────────────────────────────────────────────────────────────

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Mutable access for the host (reloads, navigation).  Cached nodes are
    /// re-validated on their next read, so no explicit clear is required.
    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn registry(&self) -> &SelectorRegistry {
        &self.registry
    }

    pub fn cached_fields(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::PageResult;
    use crate::models::Field;
    use crate::page::{HtmlNode, HtmlPage};

    const TRADING_PAGE: &str = r#"
        <html><head><title>67,012.5 | BTCUSDT | Binance Futures</title></head><body>
          <div data-testid="contract-symbol">BTCUSDT Perpetual</div>
          <div data-testid="active-interval">4h</div>
          <div class="order-form">
            <button data-testid="leverage-display">20x</button>
            <button>50x</button>
            <div data-testid="margin-mode">Isolated Margin</div>
          </div>
          <table class="position-table"><tbody>
            <tr><td>BTCUSDT Perp</td><td>0.500 BTC</td><td>+12.50 PNL</td></tr>
            <tr><td>ETHUSDT Perp</td><td>-2.0 ETH</td></tr>
            <tr><td>No symbol here</td><td>1.0 SOL</td></tr>
          </tbody></table>
        </body></html>"#;

    fn engine(html: &str) -> ContextEngine<HtmlPage> {
        ContextEngine::new(HtmlPage::parse(html), SelectorRegistry::binance_futures())
    }

    /// Records every structural query so tests can tell cache hits from
    /// fresh lookups.
    struct CountingPage {
        inner:   HtmlPage,
        queries: RefCell<Vec<String>>,
    }

    impl CountingPage {
        fn new(html: &str) -> Self {
            Self { inner: HtmlPage::parse(html), queries: RefCell::new(Vec::new()) }
        }

        fn take_queries(&self) -> Vec<String> {
            self.queries.take()
        }
    }

    impl Page for CountingPage {
        type Node = HtmlNode;

        fn select_first(&self, query: &str) -> PageResult<Option<HtmlNode>> {
            self.queries.borrow_mut().push(query.to_string());
            self.inner.select_first(query)
        }

        fn select_all(&self, query: &str) -> PageResult<Vec<HtmlNode>> {
            self.queries.borrow_mut().push(query.to_string());
            self.inner.select_all(query)
        }

        fn text(&self, node: HtmlNode) -> Option<String> {
            self.inner.text(node)
        }

        fn attribute(&self, node: HtmlNode, name: &str) -> Option<String> {
            self.inner.attribute(node, name)
        }

        fn text_nodes(&self, root: HtmlNode) -> Vec<String> {
            self.inner.text_nodes(root)
        }

        fn is_attached(&self, node: HtmlNode) -> bool {
            self.inner.is_attached(node)
        }

        fn is_descendant(&self, node: HtmlNode, ancestor: HtmlNode) -> bool {
            self.inner.is_descendant(node, ancestor)
        }

        fn location_path(&self) -> String {
            self.inner.location_path()
        }

        fn title(&self) -> String {
            self.inner.title()
        }
    }

    // ── End-to-end ────────────────────────────────────────────────────────────

    #[test]
    fn full_snapshot_from_trading_page() {
        let snapshot = engine(TRADING_PAGE).extract_context();

        assert_eq!(snapshot.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(snapshot.timeframe, "4h");
        assert_eq!(snapshot.leverage, Some(20));
        assert_eq!(snapshot.margin_type, MarginType::Isolated);
        assert_eq!(snapshot.exchange, "Binance");
        assert_eq!(snapshot.market, "futures");
        assert_eq!(snapshot.contract, "perpetual");
    }

    #[test]
    fn empty_page_degrades_to_defaults() {
        let snapshot = engine("<html><body></body></html>").extract_context();

        assert_eq!(snapshot.symbol, None);
        assert_eq!(snapshot.timeframe, "1h");
        assert_eq!(snapshot.leverage, None);
        assert_eq!(snapshot.margin_type, MarginType::Cross);
        assert!(snapshot.positions.is_empty());
    }

    // ── Symbol ────────────────────────────────────────────────────────────────

    #[test]
    fn symbol_falls_back_to_path_then_title() {
        let page = HtmlPage::parse("<html><head><title>SOLUSDT | Futures</title></head></html>")
            .with_location("/en/futures/ethusdt", None);
        let mut e = ContextEngine::new(page, SelectorRegistry::binance_futures());
        assert_eq!(e.extract_symbol().as_deref(), Some("ETHUSDT"));

        e.page_mut().set_location("/en/markets", None);
        assert_eq!(e.extract_symbol().as_deref(), Some("SOLUSDT"));
    }

    #[test]
    fn price_heading_is_not_a_symbol() {
        let page = HtmlPage::parse("<html><body><h1>67,012.5</h1></body></html>")
            .with_location("/en/futures/ETHUSDT", None);
        let mut e = ContextEngine::new(page, SelectorRegistry::binance_futures());

        assert_eq!(e.extract_symbol().as_deref(), Some("ETHUSDT"));
    }

    #[test]
    fn invalid_selector_is_skipped() {
        let mut table = SelectorRegistry::binance_futures().table().clone();
        table.fields.insert(
            Field::Symbol,
            vec!["div[[[".to_string(), "[data-testid='contract-symbol']".to_string()],
        );
        let mut e = ContextEngine::new(HtmlPage::parse(TRADING_PAGE), SelectorRegistry::new(table));

        assert_eq!(e.extract_symbol().as_deref(), Some("BTCUSDT"));
    }

    // ── Timeframe ─────────────────────────────────────────────────────────────

    #[test]
    fn timeframe_from_active_interval_button() {
        let mut e = engine(
            r#"<html><body>
                <button class="interval-item">15m</button>
                <button class="interval-item active">1d</button>
                <button class="interval-item">1w</button>
            </body></html>"#,
        );
        assert_eq!(e.extract_timeframe(), "1d");

        let mut e = engine(
            r#"<html><body>
                <button data-interval="5m">5m</button>
                <button data-interval="4h" aria-pressed="true">4h</button>
            </body></html>"#,
        );
        assert_eq!(e.extract_timeframe(), "4h");
    }

    #[test]
    fn invalid_timeframe_text_defaults_to_1h() {
        let mut e = engine(
            r#"<html><body>
                <div data-testid="active-interval">Time</div>
                <button class="interval-item active">Depth</button>
            </body></html>"#,
        );
        assert_eq!(e.extract_timeframe(), "1h");
    }

    // ── Leverage ──────────────────────────────────────────────────────────────

    #[test]
    fn dedicated_leverage_element_wins_over_buttons() {
        assert_eq!(engine(TRADING_PAGE).extract_leverage(), Some(20));
    }

    #[test]
    fn leverage_from_buttons_then_order_entry() {
        let mut e = engine(r#"<html><body><button>Buy</button><button>75X</button></body></html>"#);
        assert_eq!(e.extract_leverage(), Some(75));

        let mut e = engine(
            r#"<html><body>
                <div class="order-form"><span>Leverage</span><span>10x</span></div>
            </body></html>"#,
        );
        assert_eq!(e.extract_leverage(), Some(10));
    }

    #[test]
    fn no_order_entry_region_means_no_text_scan() {
        let mut e = engine(r#"<html><body><div><span>10x</span></div></body></html>"#);
        assert_eq!(e.extract_leverage(), None);
    }

    #[test]
    fn out_of_range_leverage_is_rejected_on_every_tier() {
        let mut e = engine(
            r#"<html><body>
                <div data-testid="leverage-display">200x</div>
                <button>150x</button>
                <div class="order-form"><span>0x</span><span>999x</span></div>
            </body></html>"#,
        );
        assert_eq!(e.extract_leverage(), None);
    }

    // ── Margin ────────────────────────────────────────────────────────────────

    #[test]
    fn margin_type_substring_and_default() {
        let mut e = engine(r#"<html><body><div class="margin-type-btn">CROSS</div></body></html>"#);
        assert_eq!(e.extract_margin_type(), MarginType::Cross);

        let mut e = engine(r#"<html><body><div class="margin-mode">Portfolio</div></body></html>"#);
        assert_eq!(e.extract_margin_type(), MarginType::Cross);

        assert_eq!(engine(TRADING_PAGE).extract_margin_type(), MarginType::Isolated);
    }

    // ── Positions ─────────────────────────────────────────────────────────────

    #[test]
    fn only_rows_with_symbols_become_positions() {
        let positions = engine(TRADING_PAGE).extract_positions();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].symbol, "BTCUSDT");
        assert_eq!(positions[0].size, Some(0.5));
        assert_eq!(positions[0].pnl.as_deref(), Some("+12.50"));
        assert_eq!(positions[1].symbol, "ETHUSDT");
        assert_eq!(positions[1].size, Some(-2.0));
        assert_eq!(positions[1].pnl, None);
    }

    #[test]
    fn nested_row_matches_count_once() {
        let html = r#"<html><body>
          <table class="position-table"><tbody>
            <tr><td>BTCUSDT Perp</td><td>0.500 BTC</td></tr>
            <tr><td><div data-testid="position-row">ETHUSDT 1 ETH</div></td></tr>
          </tbody></table>
        </body></html>"#;
        let positions = engine(html).extract_positions();

        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0].symbol, "BTCUSDT");
        assert_eq!(positions[1].symbol, "ETHUSDT");
        assert_eq!(positions[1].size, Some(1.0));
    }

    // ── Cache behaviour ───────────────────────────────────────────────────────

    #[test]
    fn second_extraction_within_ttl_uses_cached_nodes() {
        let mut e = ContextEngine::new(CountingPage::new(TRADING_PAGE), SelectorRegistry::binance_futures());
        assert_eq!(e.cache_ttl(), DEFAULT_TTL);

        let first = e.extract_context();
        e.page().take_queries();
        assert_eq!(e.cached_fields(), 4);

        let second = e.extract_context();
        let queries = e.page().take_queries();

        // Only the uncached positions scan touches the page again.
        assert_eq!(queries, e.registry().strategies(Field::Positions));
        assert_eq!(first.symbol, second.symbol);
        assert_eq!(first.timeframe, second.timeframe);
        assert_eq!(first.leverage, second.leverage);
        assert_eq!(first.margin_type, second.margin_type);
    }

    #[test]
    fn clear_cache_forces_fresh_lookups() {
        let mut e = ContextEngine::new(CountingPage::new(TRADING_PAGE), SelectorRegistry::binance_futures());
        e.extract_symbol();
        e.page().take_queries();

        e.clear_cache();
        assert_eq!(e.cached_fields(), 0);
        assert_eq!(e.extract_symbol().as_deref(), Some("BTCUSDT"));
        assert_eq!(e.page().take_queries(), vec!["[data-testid='contract-symbol']".to_string()]);
    }

    #[test]
    fn zero_ttl_never_hits() {
        let mut e = ContextEngine::with_ttl(
            CountingPage::new(TRADING_PAGE),
            SelectorRegistry::binance_futures(),
            Duration::ZERO,
        );
        e.extract_leverage();
        e.page().take_queries();

        assert_eq!(e.extract_leverage(), Some(20));
        assert_eq!(e.page().take_queries(), vec!["[data-testid='leverage-display']".to_string()]);
    }

    #[test]
    fn detached_cached_node_falls_through_the_ladder() {
        let page = HtmlPage::parse(TRADING_PAGE).with_location("/en/futures/ETHUSDT", None);
        let mut e = ContextEngine::new(page, SelectorRegistry::binance_futures());
        assert_eq!(e.extract_symbol().as_deref(), Some("BTCUSDT"));

        let node = e
            .page()
            .select_first("[data-testid='contract-symbol']")
            .unwrap()
            .unwrap();
        e.page_mut().detach(node);

        // Display gone and no other symbol selector matches: path wins.
        assert_eq!(e.extract_symbol().as_deref(), Some("ETHUSDT"));
    }

    #[test]
    fn reloaded_document_is_read_fresh() {
        let mut e = engine(TRADING_PAGE);
        assert_eq!(e.extract_leverage(), Some(20));

        e.page_mut().load(&TRADING_PAGE.replace(">20x<", ">25x<"));
        assert_eq!(e.extract_leverage(), Some(25));
    }
}
