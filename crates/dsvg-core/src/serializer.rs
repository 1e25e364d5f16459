//! XML serializer for [`Element`] trees.

use std::fmt::Write;

use crate::tree::{Element, Node};

/// Serialize an element tree to XML text without a declaration.
#[must_use]
pub fn serialize(root: &Element) -> String {
    let mut out = String::with_capacity(4096);
    serialize_element(root, &mut out);
    out
}

fn serialize_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);

    for (key, value) in &element.attrs {
        let _ = write!(out, r#" {}="{}""#, key, escape_attr(value));
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        match child {
            Node::Element(child) => serialize_element(child, out),
            Node::Text(text) => out.push_str(&escape_text(text)),
        }
    }
    let _ = write!(out, "</{}>", element.name);
}

/// Escape text for XML content.
fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape text for XML attribute values.
fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

/// Escape XML special characters.
fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\n' if escape_quotes => result.push_str("&#10;"),
            _ => result.push(ch),
        }
    }
    result
}
