//! Time-ordered numeric IDs.
//!
//! An ID is the decimal string `business_type + work_id + yyyyMMddHHmmssSSS + counter`,
//! rendered in lowercase base 36. The counter is zero-padded to a fixed width and wraps
//! back to zero once it would need one more digit.

use chrono::Local;
use parking_lot::Mutex;
use std::borrow::Cow;
use tracing::debug;

const DEFAULT_WIDTH: usize = 8;
const TIME_FORMAT: &str = "%Y%m%d%H%M%S%3f";
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[jtool_derive::jtool_error]
pub enum IdError {
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug, Default)]
pub struct IdGeneratorBuilder {
    work_id: Option<String>,
    business_type: Option<String>,
}

impl IdGeneratorBuilder {
    /// Machine or node number, digits only.
    #[must_use = "builder methods return a new builder"]
    pub fn work_id(mut self, work_id: impl Into<String>) -> Self {
        self.work_id = Some(work_id.into());
        self
    }

    /// Leading business code, digits only.
    #[must_use = "builder methods return a new builder"]
    pub fn business_type(mut self, business_type: impl Into<String>) -> Self {
        self.business_type = Some(business_type.into());
        self
    }

    /// # Errors
    /// [`IdError::InvalidArgument`] naming the field that is missing, empty or not numeric.
    pub fn build(self) -> Result<IdGenerator, IdError> {
        let work_id = digits_field("workId", self.work_id)?;
        let business_type = digits_field("businessType", self.business_type)?;
        Ok(IdGenerator { prefix: format!("{business_type}{work_id}"), seq: Mutex::new(0) })
    }
}

fn digits_field(name: &str, value: Option<String>) -> Result<String, IdError> {
    match value {
        Some(v) if !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit()) => Ok(v),
        Some(v) if !v.is_empty() => Err(IdError::InvalidArgument {
            message: format!("{name} must contain only digits, value: [{v}]").into(),
            context: None,
        }),
        other => Err(IdError::InvalidArgument {
            message: format!("{name} can not be empty, value: [{}]", other.unwrap_or_default())
                .into(),
            context: None,
        }),
    }
}

/// Thread-safe generator; share it behind an `Arc` or a static.
#[derive(Debug)]
pub struct IdGenerator {
    prefix: String,
    seq: Mutex<u64>,
}

impl IdGenerator {
    #[must_use]
    pub fn builder() -> IdGeneratorBuilder {
        IdGeneratorBuilder::default()
    }

    /// Next ID with an 8-digit counter.
    #[must_use]
    pub fn next_id(&self) -> String {
        self.next_id_with_len(DEFAULT_WIDTH)
    }

    /// Next ID with a `width`-digit counter. A width of zero is treated as one.
    #[must_use]
    pub fn next_id_with_len(&self, width: usize) -> String {
        let width = width.max(1);
        let counter = self.next_counter(width);
        let time = Local::now().format(TIME_FORMAT);
        let decimal = format!("{}{time}{counter:0>width$}", self.prefix);
        to_base36(&decimal)
    }

    fn next_counter(&self, width: usize) -> String {
        let mut seq = self.seq.lock();
        let mut current = seq.to_string();
        *seq += 1;
        if current.len() > width {
            debug!(width, "id counter wrapped");
            current = "0".to_owned();
            *seq = 1;
        }
        current
    }
}

/// Converts an arbitrary-length string of decimal digits to lowercase base 36.
/// Leading zeros are ignored; non-digit characters are skipped.
#[must_use]
pub fn to_base36(decimal: &str) -> String {
    let mut number: Vec<u8> =
        decimal.bytes().filter(u8::is_ascii_digit).map(|b| b - b'0').skip_while(|d| *d == 0).collect();
    if number.is_empty() {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while !number.is_empty() {
        let mut quotient = Vec::with_capacity(number.len());
        let mut remainder: u32 = 0;
        for digit in &number {
            let acc = remainder * 10 + u32::from(*digit);
            let q = (acc / 36) as u8;
            remainder = acc % 36;
            if !quotient.is_empty() || q != 0 {
                quotient.push(q);
            }
        }
        out.push(DIGITS[remainder as usize]);
        number = quotient;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
