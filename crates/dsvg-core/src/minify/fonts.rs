//! `<font>` to `<span>` inside HTML labels.

use crate::tree::Element;

const FOREIGN_OBJECT: &str = "foreignObject";

/// Replace every `font` element below a `foreignObject` with a `span`
/// carrying the same attributes and children. Returns the number replaced.
pub(crate) fn unwrap_fonts(element: &mut Element) -> usize {
    let mut count = 0;
    if element.is(FOREIGN_OBJECT) {
        for child in element.elements_mut() {
            count += rename_fonts(child);
        }
    }
    for child in element.elements_mut() {
        count += unwrap_fonts(child);
    }
    count
}

fn rename_fonts(element: &mut Element) -> usize {
    let mut count = 0;
    if element.is("font") {
        "span".clone_into(&mut element.name);
        count += 1;
    }
    for child in element.elements_mut() {
        count += rename_fonts(child);
    }
    count
}
