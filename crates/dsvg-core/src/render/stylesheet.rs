//! Default cell styles and draw.io style string parsing.

use indexmap::IndexMap;

/// Style keys and values, e.g. `fillColor` → `#dae8fc`.
pub type StyleMap = IndexMap<String, String>;

/// Default vertex and edge styles that cell styles are layered over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    /// Defaults for `vertex="1"` cells.
    pub vertex: StyleMap,
    /// Defaults for `edge="1"` cells.
    pub edge: StyleMap,
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self {
            vertex: style_map(&[
                ("shape", "rectangle"),
                ("fillColor", "#ffffff"),
                ("strokeColor", "#000000"),
                ("strokeWidth", "1"),
                ("fontColor", "#000000"),
                ("fontFamily", "Helvetica"),
                ("fontSize", "12"),
            ]),
            edge: style_map(&[
                ("strokeColor", "#000000"),
                ("strokeWidth", "1"),
                ("fontColor", "#000000"),
                ("fontFamily", "Helvetica"),
                ("fontSize", "11"),
                ("endArrow", "classic"),
            ]),
        }
    }
}

fn style_map(entries: &[(&str, &str)]) -> StyleMap {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

impl Stylesheet {
    /// Resolve a cell's style string against the vertex or edge defaults.
    #[must_use]
    pub fn resolve(&self, style: Option<&str>, edge: bool) -> CellStyle {
        let mut props = if edge {
            self.edge.clone()
        } else {
            self.vertex.clone()
        };
        for (key, value) in parse_cell_style(style.unwrap_or_default()) {
            // `default` means "whatever the stylesheet says"
            if value != "default" {
                props.insert(key, value);
            }
        }
        CellStyle { props }
    }
}

/// Parse a draw.io style string such as `ellipse;whiteSpace=wrap;html=1;`.
///
/// A leading bare token names a style; it is reported as `shape` unless the
/// string sets `shape` explicitly.
#[must_use]
pub fn parse_cell_style(style: &str) -> StyleMap {
    let mut map = StyleMap::new();
    let mut named = None;
    for token in style.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('=') {
            Some((key, value)) => {
                map.insert(key.trim().to_owned(), value.trim().to_owned());
            }
            None if named.is_none() => named = Some(token),
            None => {}
        }
    }
    if let Some(name) = named
        && !map.contains_key("shape")
    {
        map.insert("shape".to_owned(), name.to_owned());
    }
    map
}

/// Fully resolved style of one cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellStyle {
    props: StyleMap,
}

impl CellStyle {
    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Value for a key, or `fallback` when unset.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Numeric value for a key, or `fallback` when unset or unparsable.
    #[must_use]
    pub fn number(&self, key: &str, fallback: f64) -> f64 {
        self.get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback)
    }

    /// Check whether a `0`/`1` flag is set.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("1")
    }

    /// Shape name (`rectangle` when unset).
    #[must_use]
    pub fn shape(&self) -> &str {
        self.get_or("shape", "rectangle")
    }
}
