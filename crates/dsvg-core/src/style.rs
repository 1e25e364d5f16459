//! Inline `style` attribute parsing and canonical serialization.

use std::cmp::Ordering;
use std::fmt;

/// Font family prefix collapsed into a single family name.
const IOSEVKA_PREFIX: &str = "Iosevka";
/// Family name used for every Iosevka variant.
const IOSEVKA_FAMILY: &str = "IosevkaFtl";

/// Ordered `property:value` pairs from an inline style string.
///
/// Duplicate properties are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    directives: Vec<(String, String)>,
}

impl StyleDeclaration {
    /// Directives in their current order.
    #[must_use]
    pub fn directives(&self) -> &[(String, String)] {
        &self.directives
    }

    /// Check whether there are no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Rewrite every `font-family` starting with `Iosevka` to `IosevkaFtl`.
    pub fn normalize_fonts(&mut self) {
        for (property, value) in &mut self.directives {
            if property == "font-family" && value.starts_with(IOSEVKA_PREFIX) {
                IOSEVKA_FAMILY.clone_into(value);
            }
        }
    }

    /// Stable sort by property name using [`locale_cmp`].
    pub fn sort(&mut self) {
        self.directives.sort_by(|a, b| locale_cmp(&a.0, &b.0));
    }

    /// Serialize as `prop:value` pairs joined by `;`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Canonical form: fonts normalized, directives sorted.
    #[must_use]
    pub fn canonical(mut self) -> String {
        self.normalize_fonts();
        self.sort();
        self.to_css()
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{property}:{value}")?;
        }
        Ok(())
    }
}

/// Parse an inline style string.
///
/// Directives are split on `;` and then on the first `:`; blank directives are
/// skipped and both halves are trimmed. A directive without `:` gets an empty
/// value.
#[must_use]
pub fn parse_style(style: &str) -> StyleDeclaration {
    let directives = style
        .split(';')
        .filter(|directive| !directive.trim().is_empty())
        .map(|directive| {
            let (property, value) = directive.split_once(':').unwrap_or((directive, ""));
            (property.trim().to_owned(), value.trim().to_owned())
        })
        .collect();
    StyleDeclaration { directives }
}

/// Locale-style string comparison.
///
/// Characters are first compared case-insensitively with whitespace before
/// punctuation before digits before letters; ties are broken by putting
/// lowercase before uppercase, then by code point.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_key)
        .cmp(b.chars().map(primary_key))
        .then_with(|| a.chars().map(case_key).cmp(b.chars().map(case_key)))
        .then_with(|| a.cmp(b))
}

fn primary_key(c: char) -> (u8, char) {
    let class = if c.is_whitespace() {
        0
    } else if c.is_numeric() {
        2
    } else if c.is_alphabetic() {
        3
    } else {
        1
    };
    (class, c.to_lowercase().next().unwrap_or(c))
}

fn case_key(c: char) -> u8 {
    u8::from(c.is_uppercase())
}
