//! `xmlns` removal inside HTML content.

use crate::tree::Element;

/// Remove `xmlns` from every element strictly below a `foreignObject`.
///
/// The flag is handed down per call, so it only holds along paths that pass
/// through a `foreignObject`. Returns the number of attributes removed.
pub(crate) fn strip_foreign_namespaces(element: &mut Element, in_foreign_object: bool) -> usize {
    let mut count = 0;
    if in_foreign_object && element.remove_attr("xmlns").is_some() {
        count += 1;
    }

    let child_flag = in_foreign_object || element.is("foreignObject");
    for child in element.elements_mut() {
        count += strip_foreign_namespaces(child, child_flag);
    }
    count
}
