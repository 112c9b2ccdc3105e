//! Text helpers with no I/O: emptiness checks, casing, joining, number formatting,
//! random passwords and codes, SQL `LIKE` escaping, capacity sizing and pinyin.

pub mod code;
pub mod collections;
pub mod env;
mod error;
pub mod numbers;
pub mod password;
pub mod pinyin;
pub mod sql;
pub mod strings;

pub use crate::error::{TextError, TextErrorExt};
pub use rust_decimal::Decimal;
