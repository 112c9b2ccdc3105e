//! Process environment lookups.

use std::path::MAIN_SEPARATOR;

/// Value of the environment variable `name`, or `""` when unset or not unicode.
#[must_use]
pub fn property(name: &str) -> String {
    std::env::var(name).unwrap_or_default()
}

/// Like [`property`] with one trailing path separator removed.
#[must_use]
pub fn path_property(name: &str) -> String {
    let mut value = property(name);
    if value.ends_with(MAIN_SEPARATOR) {
        value.pop();
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_empty() {
        assert_eq!(property("JTOOL_TEXT_SURELY_UNSET_VARIABLE"), "");
        assert_eq!(path_property("JTOOL_TEXT_SURELY_UNSET_VARIABLE"), "");
    }

    #[test]
    fn test_path_is_set() {
        assert!(!property("PATH").is_empty());
    }
}
