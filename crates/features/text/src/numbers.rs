//! Number formatting and decimal arithmetic.
//!
//! Formatting rounds half-to-even like a locale number format; [`rounding`] rounds half-up.
//! Values go through their shortest decimal representation first, so `0.125` is exactly
//! `0.125` and not its binary neighbour.

use crate::TextError;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

const DEFAULT_FRACTION_DIGITS: u32 = 3;
const GROUP_SIZE: usize = 3;

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string()).ok().or_else(|| Decimal::from_f64(value))
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_owned())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "∞" } else { "-∞" }.to_owned())
    } else {
        None
    }
}

/// Up to three fraction digits, no grouping: `1234.5678` -> `1234.568`.
#[must_use]
pub fn plain_format(value: f64) -> String {
    default_format(value, None)
}

/// Up to three fraction digits with `,` grouping: `1234567.5` -> `1,234,567.5`.
#[must_use]
pub fn grouped_format(value: f64) -> String {
    default_format(value, Some(GROUP_SIZE))
}

fn default_format(value: f64, grouping: Option<usize>) -> String {
    let spec = NumberPattern {
        min_int: 1,
        min_frac: 0,
        max_frac: DEFAULT_FRACTION_DIGITS,
        grouping,
        ..NumberPattern::default()
    };
    spec.format(value)
}

/// Formats with a decimal pattern such as `#,##0.00`, `0.#`, `00.000%` or `¥#,##0.00 元`.
///
/// `0` is a mandatory digit, `#` an optional one, `,` sets the grouping size and `.` the
/// decimal point. Other characters before or after the digits are copied as literals; a `%`
/// among them multiplies the value by 100. A `;negative` sub-pattern is ignored.
///
/// # Errors
/// [`TextError::Pattern`] for patterns with no digit placeholders or more than one `.`.
pub fn pattern_format(value: f64, pattern: &str) -> Result<String, TextError> {
    Ok(NumberPattern::parse(pattern)?.format(value))
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct NumberPattern {
    prefix: String,
    suffix: String,
    min_int: usize,
    min_frac: usize,
    max_frac: u32,
    grouping: Option<usize>,
    percent: bool,
}

impl NumberPattern {
    fn parse(pattern: &str) -> Result<Self, TextError> {
        let positive = pattern.split(';').next().unwrap_or_default();
        let is_digit_part = |c: char| matches!(c, '0' | '#' | ',' | '.');

        let Some(start) = positive.find(is_digit_part) else {
            return Err(TextError::Pattern {
                message: format!("no digit placeholder in `{pattern}`").into(),
                context: None,
            });
        };
        let end = positive[start..].find(|c| !is_digit_part(c)).map_or(positive.len(), |i| start + i);
        let (prefix, body, suffix) = (&positive[..start], &positive[start..end], &positive[end..]);

        let mut halves = body.split('.');
        let int_part = halves.next().unwrap_or_default();
        let frac_part = halves.next().unwrap_or_default();
        if halves.next().is_some() {
            return Err(TextError::Pattern {
                message: format!("more than one decimal point in `{pattern}`").into(),
                context: None,
            });
        }

        let grouping = int_part.rfind(',').map(|i| int_part[i + 1..].len()).filter(|n| *n > 0);
        let min_frac = frac_part.chars().filter(|c| *c == '0').count();

        Ok(Self {
            prefix: prefix.to_owned(),
            suffix: suffix.to_owned(),
            min_int: int_part.chars().filter(|c| *c == '0').count(),
            min_frac,
            max_frac: frac_part.chars().filter(|c| matches!(c, '0' | '#')).count() as u32,
            grouping,
            percent: prefix.contains('%') || suffix.contains('%'),
        })
    }

    fn format(&self, value: f64) -> String {
        if let Some(special) = non_finite(value) {
            return special;
        }
        let Some(mut number) = to_decimal(value) else {
            return value.to_string();
        };
        if self.percent {
            number *= Decimal::ONE_HUNDRED;
        }

        let negative = number.is_sign_negative();
        let rounded = number
            .abs()
            .round_dp_with_strategy(self.max_frac, RoundingStrategy::MidpointNearestEven)
            .normalize();
        let text = rounded.to_string();
        let (int_digits, frac_digits) = text.split_once('.').unwrap_or((&text, ""));

        let mut frac = frac_digits.to_owned();
        while frac.len() < self.min_frac {
            frac.push('0');
        }

        let mut int = if int_digits == "0" { String::new() } else { int_digits.to_owned() };
        while int.len() < self.min_int {
            int.insert(0, '0');
        }
        if int.is_empty() && frac.is_empty() {
            int.push('0');
        }
        if let Some(size) = self.grouping {
            int = group(&int, size);
        }

        let sign = if negative && !rounded.is_zero() { "-" } else { "" };
        let point = if frac.is_empty() { "" } else { "." };
        format!("{sign}{}{int}{point}{frac}{}", self.prefix, self.suffix)
    }
}

fn group(digits: &str, size: usize) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / size);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % size == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rounds half-up (away from zero on ties) to `precision` fraction digits.
#[must_use]
pub fn rounding(value: f64, precision: u32) -> f64 {
    to_decimal(value)
        .map(|d| d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Logarithm of `value` in `base`; `0` for a zero value.
#[must_use]
pub fn log(value: f64, base: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.ln() / base.ln() }
}

#[must_use]
pub fn log2(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.log2() }
}

#[must_use]
pub fn log10(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.log10() }
}

#[must_use]
pub fn ln(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value.ln() }
}

fn decimal_arg(value: f64) -> Result<Decimal, TextError> {
    to_decimal(value).ok_or_else(|| TextError::invalid(format!("{value} is not representable")))
}

fn overflow() -> TextError {
    TextError::invalid("decimal overflow")
}

/// `decimal / divisor`; a zero divisor yields zero.
///
/// # Errors
/// [`TextError::InvalidArgument`] for non-finite divisors or overflow.
pub fn divide_decimal(decimal: Decimal, divisor: f64) -> Result<Decimal, TextError> {
    if divisor == 0.0 {
        return Ok(Decimal::ZERO);
    }
    decimal.checked_div(decimal_arg(divisor)?).ok_or_else(overflow)
}

/// # Errors
/// [`TextError::InvalidArgument`] for non-finite factors or overflow.
pub fn multiply_decimal(decimal: Decimal, factor: f64) -> Result<Decimal, TextError> {
    decimal.checked_mul(decimal_arg(factor)?).ok_or_else(overflow)
}

/// # Errors
/// [`TextError::InvalidArgument`] on overflow.
pub fn add_decimal(decimal: Decimal, add: i64) -> Result<Decimal, TextError> {
    decimal.checked_add(Decimal::from(add)).ok_or_else(overflow)
}

/// # Errors
/// [`TextError::InvalidArgument`] on overflow.
pub fn subtract_decimal(decimal: Decimal, subtract: i64) -> Result<Decimal, TextError> {
    decimal.checked_sub(Decimal::from(subtract)).ok_or_else(overflow)
}
