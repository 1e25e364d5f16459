//! Attribute stripping and group flattening.

use crate::tree::{Element, Node};

/// Remove `data-*` and `pointer-events` attributes everywhere.
/// Returns the number of attributes removed.
pub(crate) fn strip_attributes(element: &mut Element) -> usize {
    let before = element.attrs.len();
    element.retain_attrs(|name, _| !name.starts_with("data-") && name != "pointer-events");
    let mut count = before - element.attrs.len();
    for child in element.elements_mut() {
        count += strip_attributes(child);
    }
    count
}

/// Make the whole canvas hit-testable again.
pub(crate) fn restore_root_pointer_events(svg: &mut Element) {
    svg.set_attr("pointer-events", "all");
}

/// Replace attribute-less single-child `g` wrappers with their child.
///
/// Each child slot is collapsed until its occupant no longer qualifies before
/// the walk descends, so nested wrapper chains disappear in one pass. The
/// element passed in is never replaced itself. Returns the number of groups
/// removed.
pub(crate) fn collapse_groups(element: &mut Element) -> usize {
    let mut count = 0;
    for child in element.elements_mut() {
        while let Some(inner) = take_only_child(child) {
            *child = inner;
            count += 1;
        }
        count += collapse_groups(child);
    }
    count
}

fn take_only_child(group: &mut Element) -> Option<Element> {
    if !group.is("g") || !group.attrs.is_empty() {
        return None;
    }
    let [Node::Element(_)] = group.children.as_slice() else {
        return None;
    };
    match group.children.pop() {
        Some(Node::Element(child)) => Some(child),
        _ => None,
    }
}
