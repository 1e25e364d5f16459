//! Presentation attributes folded into the inline style.

use crate::tree::Element;

/// Attributes moved into `style`, in the order they are appended.
pub const PRESENTATION_ATTRIBUTES: [&str; 5] =
    ["color", "fill", "stroke", "stroke-width", "opacity"];

/// Move presentation attributes of every element into its `style` attribute.
/// Returns the number of attributes moved.
pub(crate) fn migrate_presentation_attributes(element: &mut Element) -> usize {
    let mut count = 0;
    for name in PRESENTATION_ATTRIBUTES {
        if let Some(value) = element.remove_attr(name) {
            let current = element.attr("style").unwrap_or_default();
            let style = format!("{current};{name}:{value}");
            let style = style.strip_prefix(';').unwrap_or(&style).to_owned();
            element.set_attr("style", style);
            count += 1;
        }
    }
    for child in element.elements_mut() {
        count += migrate_presentation_attributes(child);
    }
    count
}
