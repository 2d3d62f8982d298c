//! Open positions: every row matching a position-row selector, read fresh on
//! each call.  Rows without a recognisable symbol are dropped.  A match nested
//! inside another match is the same row seen twice and is skipped.
//!
//! Row text is the row's text leaves joined by spaces so adjacent cells never
//! fuse into one token.

use tracing::debug;

use super::Scan;
use crate::engine::patterns;
use crate::models::{Field, PositionRecord};
use crate::page::Page;

pub(crate) fn extract<P: Page>(scan: &mut Scan<'_, P>) -> Vec<PositionRecord> {
    let matched = scan.select_each(scan.registry.strategies(Field::Positions));
    let rows: Vec<P::Node> = matched
        .iter()
        .copied()
        .filter(|&row| !matched.iter().any(|&outer| scan.page.is_descendant(row, outer)))
        .collect();
    let total = rows.len();

    let positions: Vec<PositionRecord> = rows
        .into_iter()
        .filter_map(|row| patterns::position_row(&scan.page.text_nodes(row).join(" ")))
        .collect();

    debug!(rows = total, parsed = positions.len(), "positions scanned");
    positions
}
