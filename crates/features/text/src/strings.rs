//! String predicates, casing and joining.

use std::fmt::Display;

#[must_use]
pub fn is_empty(s: Option<&str>) -> bool {
    s.is_none_or(str::is_empty)
}

#[must_use]
pub fn is_not_empty(s: Option<&str>) -> bool {
    !is_empty(s)
}

/// `true` for `None`, `""` and whitespace-only strings.
#[must_use]
pub fn is_blank(s: Option<&str>) -> bool {
    s.is_none_or(|s| s.chars().all(char::is_whitespace))
}

#[must_use]
pub fn is_not_blank(s: Option<&str>) -> bool {
    !is_blank(s)
}

/// Null-safe equality; two `None`s are equal.
#[must_use]
pub fn equals(a: Option<&str>, b: Option<&str>) -> bool {
    a == b
}

#[must_use]
pub fn contains(haystack: Option<&str>, needle: Option<&str>) -> bool {
    matches!((haystack, needle), (Some(h), Some(n)) if h.contains(n))
}

/// `userName` -> `user_name` (or `USER_NAME` when `upper`).
///
/// The first character is capitalised, then each `[A-Z][a-z0-9]*` word is kept and
/// joined with `_`. Characters outside those words are dropped.
#[must_use]
pub fn camel_to_underline(s: &str, upper: bool) -> String {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let line: String = first.to_uppercase().chain(chars).collect();

    let mut out = String::with_capacity(line.len() + 4);
    for (word, end) in camel_words(&line) {
        if upper {
            out.push_str(&word.to_ascii_uppercase());
        } else {
            out.push_str(&word.to_ascii_lowercase());
        }
        if end != line.len() {
            out.push('_');
        }
    }
    out
}

/// Each `[A-Z][a-z0-9]*` run with its end offset.
fn camel_words(line: &str) -> Vec<(&str, usize)> {
    let mut words = Vec::new();
    let mut chars = line.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if !c.is_ascii_uppercase() {
            continue;
        }
        let mut end = start + c.len_utf8();
        while let Some(&(i, next)) = chars.peek() {
            if !(next.is_ascii_lowercase() || next.is_ascii_digit()) {
                break;
            }
            end = i + next.len_utf8();
            chars.next();
        }
        words.push((&line[start..end], end));
    }
    words
}

/// `user_name` -> `userName` (or `UserName` when `small_camel` is false).
#[must_use]
pub fn underline_to_camel(s: &str, small_camel: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in s.split('_').filter(|w| !w.is_empty()).enumerate() {
        let lower = word.to_lowercase();
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            if i == 0 && small_camel {
                out.push(first);
            } else {
                out.extend(first.to_uppercase());
            }
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Joins `items` between `prefix` and `suffix`; with no items `empty_value` is returned as is.
#[must_use]
pub fn joining<S: AsRef<str>>(
    delimiter: &str,
    prefix: &str,
    suffix: &str,
    items: &[S],
    empty_value: &str,
) -> String {
    if items.is_empty() {
        return empty_value.to_owned();
    }
    let body = items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(delimiter);
    format!("{prefix}{body}{suffix}")
}

/// Merges two already-wrapped lists, e.g. `merge(",", "[", "]", "[a,b]", "[c]")` gives `[a,b,c]`.
/// Empty inner parts are skipped.
#[must_use]
pub fn merge(delimiter: &str, prefix: &str, suffix: &str, source: &str, other: &str) -> String {
    let strip = |s: &str| {
        let mut inner = s.to_owned();
        if !prefix.is_empty() {
            inner = inner.replace(prefix, "");
        }
        if !suffix.is_empty() {
            inner = inner.replace(suffix, "");
        }
        inner
    };
    let parts: Vec<String> = [strip(source), strip(other)].into_iter().filter(|p| !p.is_empty()).collect();
    format!("{prefix}{}{suffix}", parts.join(delimiter))
}

/// Joins the `Display` form of each item; `""` for no items.
#[must_use]
pub fn array_to_string<T: Display>(items: &[T], connector: &str) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(connector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_empty() {
        assert!(is_empty(None));
        assert!(is_empty(Some("")));
        assert!(!is_empty(Some(" ")));
        assert!(is_blank(Some(" \t\n")));
        assert!(is_not_blank(Some(" a ")));
    }

    #[test]
    fn test_equals_and_contains() {
        assert!(equals(None, None));
        assert!(!equals(Some("a"), None));
        assert!(contains(Some("jackie"), Some("ck")));
        assert!(!contains(None, Some("a")));
    }

    #[test]
    fn test_camel_to_underline() {
        assert_eq!(camel_to_underline("userName", false), "user_name");
        assert_eq!(camel_to_underline("orderItemId2", true), "ORDER_ITEM_ID2");
        assert_eq!(camel_to_underline("", true), "");
        assert_eq!(camel_to_underline("a", false), "a");
    }

    #[test]
    fn test_camel_to_underline_drops_stray_characters() {
        assert_eq!(camel_to_underline("HTTPServer", false), "h_t_t_p_server");
        assert_eq!(camel_to_underline("user-Name", true), "USER_NAME");
        assert_eq!(camel_to_underline("名Id", false), "id");
        assert_eq!(camel_to_underline("price9Usd", false), "price9_usd");
    }

    #[test]
    fn test_underline_to_camel() {
        assert_eq!(underline_to_camel("user_name", true), "userName");
        assert_eq!(underline_to_camel("ORDER_ITEM_ID", false), "OrderItemId");
        assert_eq!(underline_to_camel("__x__y", true), "xY");
    }

    #[test]
    fn test_joining() {
        assert_eq!(joining(",", "[", "]", &["a", "b"], "-"), "[a,b]");
        assert_eq!(joining::<&str>(",", "[", "]", &[], "none"), "none");
    }

    #[test]
    fn test_merge() {
        assert_eq!(merge(",", "[", "]", "[a,b]", "[c]"), "[a,b,c]");
        assert_eq!(merge(",", "[", "]", "[]", "[c]"), "[c]");
        assert_eq!(merge("|", "", "", "x", "y"), "x|y");
    }

    #[test]
    fn test_array_to_string() {
        assert_eq!(array_to_string(&[1, 2, 3], ", "), "1, 2, 3");
        assert_eq!(array_to_string::<u8>(&[], ","), "");
    }
}
