//! String and configuration helpers

use serde_json::{Map, Value};

/// HTML's ASCII whitespace (space, tab, LF, FF, CR)
#[inline]
pub fn is_html_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r')
}

/// Trim leading and trailing HTML whitespace
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_html_whitespace)
}

/// Shallow merge: every top-level key of `source` overwrites `target`
pub fn merge(target: &mut Map<String, Value>, source: Map<String, Value>) -> &mut Map<String, Value> {
    for (key, value) in source {
        target.insert(key, value);
    }
    target
}

/// Shallow merge for typed option sets; fields set in `other` win
pub trait Merge {
    fn merge(self, other: Self) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trim() {
        assert_eq!(trim("  a.jpg 2x\n"), "a.jpg 2x");
        assert_eq!(trim("\t\r\n"), "");
        // Non-breaking space is not HTML whitespace
        assert_eq!(trim("\u{a0}x"), "\u{a0}x");
    }

    #[test]
    fn test_merge_is_shallow() {
        let Value::Object(mut base) = json!({ "a": 1, "nested": { "x": 1, "y": 2 } }) else {
            unreachable!()
        };
        let Value::Object(over) = json!({ "b": 2, "nested": { "x": 3 } }) else {
            unreachable!()
        };

        merge(&mut base, over);
        assert_eq!(Value::Object(base), json!({ "a": 1, "b": 2, "nested": { "x": 3 } }));
    }
}
