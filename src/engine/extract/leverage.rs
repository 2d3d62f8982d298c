//! Leverage ladder, ordered by cost:
//!
//! 1. dedicated leverage display (`20x`), cached
//! 2. every button whose whole text is a leverage token
//! 3. text leaves of the order-entry panel only — never the whole page
//!
//! Every rung rejects values outside `1..=125`.

use tracing::debug;

use super::{run_ladder, Scan, Strategy};
use crate::engine::patterns;
use crate::models::Field;
use crate::page::Page;

pub(crate) fn extract<P: Page>(scan: &mut Scan<'_, P>) -> Option<u32> {
    let ladder: [(&'static str, Strategy<P, u32>); 3] = [
        ("display",     from_display),
        ("buttons",     from_buttons),
        ("order_entry", from_order_entry),
    ];
    run_ladder(Field::Leverage, scan, &ladder)
}

fn from_display<P: Page>(scan: &mut Scan<'_, P>) -> Option<u32> {
    let node = scan.locate(Field::Leverage)?;
    patterns::leverage_suffix(&scan.text(node)?)
}

fn from_buttons<P: Page>(scan: &mut Scan<'_, P>) -> Option<u32> {
    let registry = scan.registry;
    scan.select_each(registry.buttons())
        .into_iter()
        .find_map(|node| patterns::leverage_token(&scan.text(node)?))
}

fn from_order_entry<P: Page>(scan: &mut Scan<'_, P>) -> Option<u32> {
    let Some(region) = scan.first_match(scan.registry.order_entry()) else {
        debug!("no order-entry region — skipping text scan");
        return None;
    };

    scan.page
        .text_nodes(region)
        .iter()
        .find_map(|text| patterns::leverage_token(text))
}
