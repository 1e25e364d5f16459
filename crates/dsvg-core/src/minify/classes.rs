//! Inline styles lifted into a shared stylesheet.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::class_name::ClassNames;
use crate::style::parse_style;
use crate::tree::{Element, Node};

/// Rule appended after the generated classes.
pub(crate) const FOREIGN_OBJECT_RULE: &str = "foreignObject{pointer-events: none;}";

/// Canonical style strings mapped to generated class names, in creation order.
#[derive(Debug, Default)]
pub struct ClassTable {
    classes: IndexMap<String, String>,
    names: ClassNames,
}

impl ClassTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Class name for a canonical style string, creating one if needed.
    pub fn class_for(&mut self, css: String) -> &str {
        let names = &mut self.names;
        self.classes
            .entry(css)
            .or_insert_with(|| names.next().unwrap_or_default())
    }

    /// Number of distinct classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check whether no class was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// `(class name, css)` pairs in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.classes
            .iter()
            .map(|(css, name)| (name.as_str(), css.as_str()))
    }

    /// Stylesheet text: one rule per class plus the `foreignObject` rule.
    #[must_use]
    pub fn stylesheet(&self) -> String {
        let mut out = String::new();
        for (name, css) in self.iter() {
            let _ = write!(out, ".{name} {{ {css} }}");
        }
        out.push_str(FOREIGN_OBJECT_RULE);
        out
    }
}

/// Replace every `style` attribute with a `class`, then prepend a `<style>`
/// element defining the classes to `svg`. Returns the table that was built.
pub(crate) fn extract_classes(svg: &mut Element) -> ClassTable {
    let mut table = ClassTable::new();
    assign_classes(svg, &mut table);

    if !table.is_empty() {
        let style = Element::new("style").with_text(table.stylesheet());
        svg.children.insert(0, Node::Element(style));
    }
    table
}

fn assign_classes(element: &mut Element, table: &mut ClassTable) {
    if let Some(style) = element.remove_attr("style") {
        let css = parse_style(&style).canonical();
        let name = table.class_for(css).to_owned();
        element.set_attr("class", name);
    }
    for child in element.elements_mut() {
        assign_classes(child, table);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn class_of<'a>(svg: &'a Element, id: &str) -> &'a str {
        fn find<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
            if el.attr("id") == Some(id) {
                return Some(el);
            }
            el.elements().find_map(|c| find(c, id))
        }
        find(svg, id).and_then(|el| el.attr("class")).unwrap()
    }

    #[test]
    fn test_same_directives_share_a_class() {
        let mut svg = Element::new("svg")
            .with_child(Element::new("rect").with_attr("id", "1").with_attr("style", "fill:red;stroke:blue"))
            .with_child(Element::new("rect").with_attr("id", "2").with_attr("style", "stroke: blue; fill: red;"))
            .with_child(Element::new("rect").with_attr("id", "3").with_attr("style", "fill:red;stroke:green"));

        let table = extract_classes(&mut svg);

        assert_eq!(table.len(), 2);
        assert_eq!(class_of(&svg, "1"), "a");
        assert_eq!(class_of(&svg, "2"), "a");
        assert_eq!(class_of(&svg, "3"), "b");
        assert!(svg.find("rect").unwrap().attr("style").is_none());
    }

    #[test]
    fn test_style_element_is_first_child() {
        let mut svg = Element::new("svg")
            .with_child(Element::new("defs"))
            .with_child(Element::new("rect").with_attr("style", "stroke:#000;fill:#fff"))
            .with_child(Element::new("text").with_attr("style", "font-family:Iosevka Term"));

        extract_classes(&mut svg);

        let style = svg.elements().next().unwrap();
        assert_eq!(style.name, "style");
        assert_eq!(
            style.text_content(),
            ".a { fill:#fff;stroke:#000 }.b { font-family:IosevkaFtl }foreignObject{pointer-events: none;}"
        );
    }

    #[test]
    fn test_iosevka_variants_merge() {
        let mut svg = Element::new("svg")
            .with_child(Element::new("div").with_attr("id", "1").with_attr("style", "font-family:Iosevka Mono;color:red"))
            .with_child(Element::new("div").with_attr("id", "2").with_attr("style", "color:red;font-family:Iosevka Aile"));

        let table = extract_classes(&mut svg);

        assert_eq!(table.len(), 1);
        assert_eq!(class_of(&svg, "1"), class_of(&svg, "2"));
    }

    #[test]
    fn test_no_styles_no_style_element() {
        let mut svg = Element::new("svg").with_child(Element::new("rect").with_attr("class", "a"));

        let table = extract_classes(&mut svg);

        assert!(table.is_empty());
        assert_eq!(svg.children.len(), 1);
    }

    #[test]
    fn test_many_classes_use_two_letter_names() {
        let mut svg = Element::new("svg");
        for i in 0..30 {
            svg.children.push(Node::Element(
                Element::new("rect")
                    .with_attr("id", i.to_string())
                    .with_attr("style", format!("opacity:{i}")),
            ));
        }

        extract_classes(&mut svg);

        assert_eq!(class_of(&svg, "25"), "z");
        assert_eq!(class_of(&svg, "26"), "aa");
        assert_eq!(class_of(&svg, "29"), "ad");
    }
}
