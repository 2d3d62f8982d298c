//! Margin-type ladder: dedicated element → `cross`.

use super::{run_ladder, Scan, Strategy};
use crate::engine::patterns;
use crate::models::{Field, MarginType};
use crate::page::Page;

pub(crate) fn extract<P: Page>(scan: &mut Scan<'_, P>) -> MarginType {
    let ladder: [(&'static str, Strategy<P, MarginType>); 1] = [("element", from_element)];
    run_ladder(Field::MarginType, scan, &ladder).unwrap_or_default()
}

fn from_element<P: Page>(scan: &mut Scan<'_, P>) -> Option<MarginType> {
    let node = scan.locate(Field::MarginType)?;
    patterns::margin_type(&scan.text(node)?)
}
