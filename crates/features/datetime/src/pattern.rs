//! `yyyy-MM-dd HH:mm:ss` style patterns on top of chrono's strftime syntax.

use crate::{DEFAULT_PATTERN, DateError, offset};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write as _;
use tracing::debug;

const DEFAULT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MILLIS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Translates a pattern such as `yyyy-MM-dd HH:mm:ss.SSS` into `%Y-%m-%d %H:%M:%S.%3f`.
///
/// Supported letters: `y M d H h m s S E a D Z X`. Text inside single quotes is literal and
/// `''` is a quote. Any other character is copied as is.
#[must_use]
pub fn to_chrono_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&x| x == c).count();

        if c == '\'' {
            if run >= 2 {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    i += 1;
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            continue;
        }

        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', _) => "%3f",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('a', _) => "%p",
            ('D', _) => "%j",
            ('Z', _) => "%z",
            ('X', _) => "%:z",
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
                i += run;
                continue;
            },
        };
        out.push_str(spec);
        i += run;
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// `yyyy-MM-dd HH:mm:ss`.
#[must_use]
pub fn format(date: NaiveDateTime) -> String {
    date.format(DEFAULT_FORMAT).to_string()
}

/// `yyyy-MM-dd HH:mm:ss.SSS`.
#[must_use]
pub fn format_millis(date: NaiveDateTime) -> String {
    date.format(MILLIS_FORMAT).to_string()
}

/// Formats with a `yyyy-MM-dd` style pattern; an empty pattern means [`DEFAULT_PATTERN`].
///
/// The date is read as wall-clock time at UTC+8, so `Z` renders `+0800` and `X` renders
/// `+08:00`.
///
/// # Errors
/// [`DateError::Format`] when chrono rejects the translated pattern.
pub fn format_pattern(date: NaiveDateTime, pattern: &str) -> Result<String, DateError> {
    let pattern = if pattern.is_empty() { DEFAULT_PATTERN } else { pattern };
    let zoned = date.and_local_timezone(offset()).single().ok_or_else(|| {
        DateError::invalid(format!("{date} has no single instant at UTC+8"))
    })?;

    let mut out = String::new();
    write!(out, "{}", zoned.format(&to_chrono_pattern(pattern)))
        .map_err(|source| DateError::Format { source, context: Some(pattern.to_owned().into()) })?;
    Ok(out)
}

/// Parses `text` with a `yyyy-MM-dd` style pattern.
///
/// Date-only patterns yield midnight. Text that does not match but is an integer is read as
/// epoch milliseconds and shifted to UTC+8. An empty pattern means [`DEFAULT_PATTERN`].
///
/// # Errors
/// [`DateError::Parse`] when neither interpretation works.
pub fn parse(text: &str, pattern: &str) -> Result<NaiveDateTime, DateError> {
    let pattern = if pattern.is_empty() { DEFAULT_PATTERN } else { pattern };
    let format = to_chrono_pattern(pattern);
    let text = text.trim();

    if let Ok(date) = NaiveDateTime::parse_from_str(text, &format) {
        return Ok(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, &format) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    if let Some(date) = text.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis) {
        debug!(text, pattern, "parsed date as epoch milliseconds");
        return Ok(date.with_timezone(&offset()).naive_local());
    }

    Err(DateError::Parse {
        message: format!("`{text}` does not match `{pattern}`").into(),
        context: None,
    })
}
