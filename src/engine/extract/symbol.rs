//! Symbol ladder: dedicated display → URL path → page title.

use super::{run_ladder, Scan, Strategy};
use crate::engine::patterns;
use crate::models::Field;
use crate::page::Page;

pub(crate) fn extract<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    let ladder: [(&'static str, Strategy<P, String>); 3] = [
        ("display", from_display),
        ("path",    from_path),
        ("title",   from_title),
    ];
    run_ladder(Field::Symbol, scan, &ladder)
}

fn from_display<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    let node = scan.locate(Field::Symbol)?;
    patterns::symbol_from_display(&scan.text(node)?)
}

fn from_path<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    patterns::symbol_from_path(&scan.page.location_path())
}

fn from_title<P: Page>(scan: &mut Scan<'_, P>) -> Option<String> {
    patterns::symbol_from_title(&scan.page.title())
}
