//! Escaping for values spliced into SQL `LIKE` clauses.

/// Trims `value` and backslash-escapes quotes, wildcards and control characters.
///
/// Blank input is returned as given.
#[must_use]
pub fn escape_special_chars(value: &str) -> String {
    if value.trim().is_empty() {
        return value.to_owned();
    }
    let trimmed = value.trim();
    let mut out = String::with_capacity(trimmed.len() + 8);
    for c in trimmed.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '%' | '_' | '\'' | '"' => {
                out.push('\\');
                out.push(c);
            },
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_special_chars("  50%_off "), "50\\%\\_off");
        assert_eq!(escape_special_chars("it's \"x\""), "it\\'s \\\"x\\\"");
    }

    #[test]
    fn test_backslash_escaped_once() {
        assert_eq!(escape_special_chars("a\\b"), "a\\\\b");
        assert_eq!(escape_special_chars("a\tb"), "a\\tb");
    }

    #[test]
    fn test_blank_unchanged() {
        assert_eq!(escape_special_chars("   "), "   ");
        assert_eq!(escape_special_chars(""), "");
    }
}
