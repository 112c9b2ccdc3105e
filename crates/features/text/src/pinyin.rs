//! Pinyin transliteration of Han characters.
//!
//! Polyphonic characters use their most common reading. Characters without a reading are
//! copied through unchanged.

use ::pinyin::ToPinyin;

/// Uppercase initial of each Han character: `"张三abc"` -> `"ZSabc"`.
#[must_use]
pub fn first_spell(s: &str) -> String {
    s.chars()
        .map(|c| {
            c.to_pinyin()
                .and_then(|p| p.first_letter().chars().next())
                .map_or(c, |letter| letter.to_ascii_uppercase())
        })
        .collect()
}

/// Lowercase toneless pinyin with `v` standing for `ü`: `"绿色"` -> `"lvse"`.
#[must_use]
pub fn full_spell(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        match c.to_pinyin() {
            Some(p) => out.extend(p.plain().chars().map(|ch| if ch == 'ü' { 'v' } else { ch })),
            None => out.push(c),
        }
    }
    out
}

/// [`first_spell`] with the whole result uppercased: `"张三abc"` -> `"ZSABC"`.
#[must_use]
pub fn head_chars(s: &str) -> String {
    first_spell(s).to_uppercase()
}

/// Uppercase hex of the UTF-8 bytes: `"中"` -> `"E4B8AD"`.
#[must_use]
pub fn cn_ascii(s: &str) -> String {
    hex::encode_upper(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_spell() {
        assert_eq!(first_spell("张三abc"), "ZSabc");
        assert_eq!(first_spell(""), "");
    }

    #[test]
    fn test_full_spell() {
        assert_eq!(full_spell("中国"), "zhongguo");
        assert_eq!(full_spell("绿"), "lv");
        assert_eq!(full_spell("a1中"), "a1zhong");
    }

    #[test]
    fn test_head_chars() {
        assert_eq!(head_chars("张三abc"), "ZSABC");
    }

    #[test]
    fn test_cn_ascii() {
        assert_eq!(cn_ascii("中"), "E4B8AD");
        assert_eq!(cn_ascii("A"), "41");
    }
}
