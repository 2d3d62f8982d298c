//! Timeframe ladder: active-interval element → active interval button → `"1h"`.

use super::{run_ladder, Scan, Strategy};
use crate::engine::patterns;
use crate::models::{Field, DEFAULT_TIMEFRAME};
use crate::page::Page;

pub(crate) fn extract<P: Page>(scan: &mut Scan<'_, P>) -> String {
    let ladder: [(&'static str, Strategy<P, String>); 2] = [
        ("active_element",  from_active_element),
        ("interval_button", from_interval_buttons),
    ];
    run_ladder(Field::Timeframe, scan, &ladder).unwrap_or_else(|| DEFAULT_TIMEFRAME.to_string())
}

fn from_active_element<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    let node = scan.locate(Field::Timeframe)?;
    patterns::timeframe(&scan.text(node)?)
}

fn from_interval_buttons<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    let registry = scan.registry;
    scan.select_each(registry.interval_buttons())
        .into_iter()
        .filter(|&node| is_flagged_active(scan.page, node))
        .find_map(|node| patterns::timeframe(&scan.text(node)?))
}

/// Active/selected marker, either as a class token or an ARIA/data flag.
fn is_flagged_active<P: Page>(page: &P, node: P::Node) -> bool {
    let class_flag = page.attribute(node, "class").is_some_and(|class| {
        class.split_whitespace().any(|c| {
            c == "active" || c == "selected" || c.ends_with("-active") || c.ends_with("-selected")
        })
    });

    class_flag
        || ["aria-selected", "aria-pressed", "data-active"]
            .iter()
            .any(|attr| page.attribute(node, attr).as_deref() == Some("true"))
}
