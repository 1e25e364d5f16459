//! Short CSS class names from a counter.

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Bijective base-26 name for `index`: `a`..`z`, `aa`..`zz`, `aaa`, ...
#[must_use]
pub fn class_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(ALPHABET[n % 26]);
        n /= 26;
    }
    letters.reverse();
    // Only ASCII letters are pushed.
    String::from_utf8(letters).unwrap_or_default()
}

/// Endless sequence of class names starting at `a`.
#[derive(Debug, Default)]
pub struct ClassNames {
    next: usize,
}

impl Iterator for ClassNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let name = class_name(self.next);
        self.next += 1;
        Some(name)
    }
}
