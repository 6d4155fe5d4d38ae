//! Formatting codes
//!
//! Server output carries `§`-prefixed color and style codes. The parser and
//! the plain-text CLI only ever see text with those removed.

use std::sync::LazyLock;

use regex::Regex;

/// `§x§R§R§G§G§B§B` RGB sequences, then any single `§X` code
static FORMAT_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"§x(?:§[0-9A-Fa-f]){6}|§.").expect("valid formatting pattern")
});

/// Remove every formatting code
///
/// Total and idempotent: stripping already-stripped text changes nothing.
pub fn strip_formatting(text: &str) -> String {
    let mut current = FORMAT_CODE.replace_all(text, "").into_owned();
    // Removing a code can butt a stray `§` against a new character
    while FORMAT_CODE.is_match(&current) {
        current = FORMAT_CODE.replace_all(&current, "").into_owned();
    }
    current
}
