//! SVG minification.
//!
//! [`minify`] rewrites a rendered SVG tree in place through a fixed sequence
//! of passes. Later passes rely on what earlier ones produced, so the order is
//! part of the contract:
//!
//! 1. `font` elements inside `foreignObject` become `span`s
//! 2. presentation attributes move into `style`
//! 3. `xmlns` is dropped below `foreignObject`
//! 4. `style` attributes become shared classes in a prepended `<style>`
//! 5. `data-*` and `pointer-events` attributes are stripped
//! 6. the root gets `pointer-events="all"` back
//! 7. attribute-less single-child groups are flattened
//!
//! Running it on its own output changes nothing.

mod classes;
mod cleanup;
mod fonts;
mod namespaces;
mod presentation;

pub use classes::ClassTable;
pub use presentation::PRESENTATION_ATTRIBUTES;

use crate::tree::Element;

/// What a [`minify`] run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MinifyReport {
    /// `font` elements turned into `span`s.
    pub fonts_unwrapped: usize,
    /// Presentation attributes moved into `style`.
    pub attributes_migrated: usize,
    /// `xmlns` attributes removed below `foreignObject`.
    pub namespaces_stripped: usize,
    /// Distinct classes emitted.
    pub classes: usize,
    /// `data-*` and `pointer-events` attributes removed.
    pub attributes_stripped: usize,
    /// Wrapper groups removed.
    pub groups_collapsed: usize,
}

/// Minify an SVG tree rooted at `svg` in place.
pub fn minify(svg: &mut Element) -> MinifyReport {
    let fonts_unwrapped = fonts::unwrap_fonts(svg);
    let attributes_migrated = presentation::migrate_presentation_attributes(svg);
    let namespaces_stripped = namespaces::strip_foreign_namespaces(svg, false);
    let classes = classes::extract_classes(svg).len();
    let attributes_stripped = cleanup::strip_attributes(svg);
    cleanup::restore_root_pointer_events(svg);
    let groups_collapsed = cleanup::collapse_groups(svg);

    let report = MinifyReport {
        fonts_unwrapped,
        attributes_migrated,
        namespaces_stripped,
        classes,
        attributes_stripped,
        groups_collapsed,
    };
    tracing::debug!(?report, "Minified SVG");
    report
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::XmlParser;
    use crate::serializer::serialize;

    fn minify_str(svg: &str) -> String {
        let mut tree = XmlParser::new().parse(svg).unwrap();
        minify(&mut tree);
        serialize(&tree)
    }

    #[test]
    fn test_rect_in_wrapper_group() {
        let out = minify_str(r#"<svg><g><rect color="red" fill="blue"/></g></svg>"#);
        assert_eq!(
            out,
            concat!(
                r#"<svg pointer-events="all">"#,
                "<style>.a { color:red;fill:blue }foreignObject{pointer-events: none;}</style>",
                r#"<rect class="a"/>"#,
                "</svg>"
            )
        );
    }

    #[test]
    fn test_wrapper_chains_collapse() {
        for depth in 1..=6 {
            let mut svg = String::from("<svg>");
            svg.push_str(&"<g>".repeat(depth));
            svg.push_str(r#"<rect fill="red"/>"#);
            svg.push_str(&"</g>".repeat(depth));
            svg.push_str("</svg>");

            let out = minify_str(&svg);
            assert!(!out.contains("<g"), "depth {depth}: {out}");
            assert!(out.contains(r#"<rect class="a"/>"#), "depth {depth}: {out}");
        }
    }

    #[test]
    fn test_full_label_pipeline() {
        let input = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" pointer-events="none">"#,
            "<defs/>",
            "<g>",
            r##"<g data-cell-id="2"><rect x="0" y="0" width="10" height="10" fill="#fff" stroke="#000" pointer-events="all"/></g>"##,
            r##"<g data-cell-id="3"><rect x="20" y="0" width="10" height="10" stroke="#000" fill="#fff"/></g>"##,
            r#"<g><foreignObject pointer-events="none" style="overflow: visible;">"#,
            r#"<div xmlns="http://www.w3.org/1999/xhtml" style="display: flex;">"#,
            r#"<font style="font-family: Iosevka Mono; color: red">Hi</font>"#,
            "</div></foreignObject></g>",
            "</g>",
            "</svg>"
        );

        let mut tree = XmlParser::new().parse(input).unwrap();
        let report = minify(&mut tree);
        let out = serialize(&tree);

        assert_eq!(report.fonts_unwrapped, 1);
        assert_eq!(report.namespaces_stripped, 1);
        assert_eq!(report.classes, 4);
        assert_eq!(
            out,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" pointer-events="all">"#,
                "<style>",
                ".a { fill:#fff;stroke:#000 }",
                ".b { overflow:visible }",
                ".c { display:flex }",
                ".d { color:red;font-family:IosevkaFtl }",
                "foreignObject{pointer-events: none;}",
                "</style>",
                "<defs/>",
                "<g>",
                r#"<rect x="0" y="0" width="10" height="10" class="a"/>"#,
                r#"<rect x="20" y="0" width="10" height="10" class="a"/>"#,
                r#"<foreignObject class="b"><div class="c"><span class="d">Hi</span></div></foreignObject>"#,
                "</g>",
                "</svg>"
            )
        );
    }

    #[test]
    fn test_minify_is_idempotent() {
        let input = concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg">"#,
            r#"<g><g data-cell-id="1"><rect fill="red" stroke="blue"/></g>"#,
            r##"<g data-cell-id="2"><text style="font-size:12px" color="#000">x</text></g></g>"##,
            "</svg>"
        );
        let once = minify_str(input);
        let twice = minify_str(&once);
        assert_eq!(once, twice);
    }
}
