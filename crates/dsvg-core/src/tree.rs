//! Owned element tree shared by the decoder, renderer and minifier.
//!
//! A parent exclusively owns its children, so replacing or removing a node is
//! always an operation on the parent's `children` vector.

use indexmap::IndexMap;

/// Child of an element: either a nested element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (entities already decoded).
    Text(String),
}

impl Node {
    /// Borrow the element if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Mutably borrow the element if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// XML element with ordered, unique attributes and ordered children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name as written in the source (`svg`, `xlink:href`, ...).
    pub name: String,
    /// Attributes in document order.
    pub attrs: IndexMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a text child.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Append an element child.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append several element children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Check whether the element has the given tag name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Check whether an attribute is present.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the remaining ones.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    /// Keep only the attributes for which `keep` returns true.
    pub fn retain_attrs(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.attrs.retain(|name, value| keep(name, value));
    }

    /// Iterate over element children.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterate mutably over element children.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First element child with the given tag name.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|child| child.is(name))
    }

    /// First element with the given tag name, searching this element and its
    /// descendants in document order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Element> {
        if self.is(name) {
            return Some(self);
        }
        self.elements().find_map(|child| child.find(name))
    }

    /// First descendant (excluding this element) with the given tag name.
    #[must_use]
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.elements().find_map(|child| child.find(name))
    }

    /// Concatenated text of this element and all descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attr_keeps_position() {
        let mut el = Element::new("rect")
            .with_attr("x", "1")
            .with_attr("style", "a:b")
            .with_attr("y", "2");

        el.set_attr("style", "c:d");

        let names: Vec<_> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(names, ["x", "style", "y"]);
        assert_eq!(el.attr("style"), Some("c:d"));
    }

    #[test]
    fn test_remove_attr_preserves_order() {
        let mut el = Element::new("rect")
            .with_attr("a", "1")
            .with_attr("b", "2")
            .with_attr("c", "3");

        assert_eq!(el.remove_attr("a"), Some("1".to_owned()));
        assert_eq!(el.remove_attr("missing"), None);

        let names: Vec<_> = el.attrs.keys().map(String::as_str).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_find_searches_depth_first() {
        let tree = Element::new("mxfile").with_child(
            Element::new("diagram")
                .with_attr("id", "first")
                .with_child(Element::new("mxGraphModel")),
        );

        assert_eq!(tree.find("diagram").and_then(|d| d.attr("id")), Some("first"));
        assert!(tree.find("mxGraphModel").is_some());
        assert!(tree.find("missing").is_none());
        assert!(tree.find("mxfile").is_some());
        assert!(tree.find_descendant("mxfile").is_none());
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let el = Element::new("div")
            .with_text("a")
            .with_child(Element::new("b").with_text("b"))
            .with_text("c");

        assert_eq!(el.text_content(), "abc");
    }
}
