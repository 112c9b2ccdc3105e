//! Cell values and the conversions between them and field types.

use crate::ExcelError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Day zero of the 1900 date system as Excel counts it.
const SERIAL_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1899, 12, 30) {
    Some(date) => date,
    None => NaiveDate::MIN,
};
const MILLIS_PER_DAY: f64 = 86_400_000.0;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// One worksheet cell as seen by [`IntoCell`] and [`FromCell`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

static EMPTY: CellValue = CellValue::Empty;

/// The cell at `position`, or [`CellValue::Empty`] past the end.
#[must_use]
pub fn cell_at(cells: &[CellValue], position: usize) -> &CellValue {
    cells.get(position).unwrap_or(&EMPTY)
}

impl CellValue {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

pub(crate) fn to_serial(date: NaiveDateTime) -> f64 {
    (date - SERIAL_EPOCH.and_time(NaiveTime::MIN)).num_milliseconds() as f64 / MILLIS_PER_DAY
}

pub(crate) fn from_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() {
        return None;
    }
    let millis = Duration::try_milliseconds((serial * MILLIS_PER_DAY).round() as i64)?;
    SERIAL_EPOCH.and_time(NaiveTime::MIN).checked_add_signed(millis)
}

/// Converts a field into a cell for export.
pub trait IntoCell {
    fn to_cell(&self) -> CellValue;
}

/// Converts an imported cell into a field.
pub trait FromCell: Sized {
    /// # Errors
    /// [`ExcelError::Conversion`] when the cell does not hold a compatible value.
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError>;
}

macro_rules! lossless_int {
    ($($t:ty),*) => {$(
        impl IntoCell for $t {
            fn to_cell(&self) -> CellValue {
                CellValue::Int(i64::from(*self))
            }
        }
    )*};
}

macro_rules! wide_int {
    ($($t:ty),*) => {$(
        impl IntoCell for $t {
            fn to_cell(&self) -> CellValue {
                i64::try_from(*self).map_or(CellValue::Float(*self as f64), CellValue::Int)
            }
        }
    )*};
}

lossless_int!(i8, i16, i32, i64, u8, u16, u32);
wide_int!(u64, usize, isize);

macro_rules! from_int {
    ($($t:ty),*) => {$(
        impl FromCell for $t {
            fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
                let value = integer(cell)?;
                <$t>::try_from(value).map_err(|_| {
                    ExcelError::conversion(format!("{value} does not fit in {}", stringify!($t)))
                })
            }
        }
    )*};
}

from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

fn integer(cell: &CellValue) -> Result<i64, ExcelError> {
    match cell {
        CellValue::Int(i) => Ok(*i),
        CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e18 => Ok(*f as i64),
        CellValue::Bool(b) => Ok(i64::from(*b)),
        CellValue::Text(s) => {
            s.trim().parse().map_err(|_| ExcelError::conversion(format!("`{s}` is not an integer")))
        },
        CellValue::Empty => Err(ExcelError::conversion("cell is empty")),
        other => Err(ExcelError::conversion(format!("{other:?} is not an integer"))),
    }
}

fn float(cell: &CellValue) -> Result<f64, ExcelError> {
    match cell {
        CellValue::Int(i) => Ok(*i as f64),
        CellValue::Float(f) => Ok(*f),
        CellValue::Text(s) => {
            s.trim().parse().map_err(|_| ExcelError::conversion(format!("`{s}` is not a number")))
        },
        CellValue::Empty => Err(ExcelError::conversion("cell is empty")),
        other => Err(ExcelError::conversion(format!("{other:?} is not a number"))),
    }
}

impl IntoCell for f64 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(*self)
    }
}

impl IntoCell for f32 {
    fn to_cell(&self) -> CellValue {
        CellValue::Float(f64::from(*self))
    }
}

impl FromCell for f64 {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        float(cell)
    }
}

impl FromCell for f32 {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        float(cell).map(|f| f as Self)
    }
}

impl IntoCell for bool {
    fn to_cell(&self) -> CellValue {
        CellValue::Bool(*self)
    }
}

impl FromCell for bool {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        match cell {
            CellValue::Bool(b) => Ok(*b),
            CellValue::Int(0) => Ok(false),
            CellValue::Int(1) => Ok(true),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                _ => Err(ExcelError::conversion(format!("`{s}` is not a boolean"))),
            },
            other => Err(ExcelError::conversion(format!("{other:?} is not a boolean"))),
        }
    }
}

impl IntoCell for String {
    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

impl IntoCell for &str {
    fn to_cell(&self) -> CellValue {
        CellValue::Text((*self).to_owned())
    }
}

/// Numbers with no fraction are written without a trailing `.0`; empty cells give `""`.
impl FromCell for String {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        Ok(match cell {
            CellValue::Empty => Self::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < 1.0e15 => (*f as i64).to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::DateTime(d) => d.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }
}

impl IntoCell for NaiveDateTime {
    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }
}

impl IntoCell for NaiveDate {
    fn to_cell(&self) -> CellValue {
        CellValue::Date(*self)
    }
}

impl FromCell for NaiveDateTime {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        match cell {
            CellValue::DateTime(d) => Ok(*d),
            CellValue::Date(d) => Ok(d.and_time(NaiveTime::MIN)),
            CellValue::Int(i) => from_serial(*i as f64)
                .ok_or_else(|| ExcelError::conversion(format!("{i} is not a date serial"))),
            CellValue::Float(f) => from_serial(*f)
                .ok_or_else(|| ExcelError::conversion(format!("{f} is not a date serial"))),
            CellValue::Text(s) => parse_text_date(s.trim())
                .ok_or_else(|| ExcelError::conversion(format!("`{s}` is not a date"))),
            other => Err(ExcelError::conversion(format!("{other:?} is not a date"))),
        }
    }
}

impl FromCell for NaiveDate {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        match cell {
            CellValue::Date(d) => Ok(*d),
            other => NaiveDateTime::from_cell(other).map(|d| d.date()),
        }
    }
}

fn parse_text_date(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(text, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

impl<T: IntoCell> IntoCell for Option<T> {
    fn to_cell(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Empty, IntoCell::to_cell)
    }
}

/// Empty and blank text cells give `None`.
impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        if cell.is_empty() { Ok(None) } else { T::from_cell(cell).map(Some) }
    }
}

impl IntoCell for CellValue {
    fn to_cell(&self) -> CellValue {
        self.clone()
    }
}

impl FromCell for CellValue {
    fn from_cell(cell: &CellValue) -> Result<Self, ExcelError> {
        Ok(cell.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        assert!((to_serial(date) - 45_292.5).abs() < 1e-9);
        assert_eq!(from_serial(45_292.5), Some(date));
        assert_eq!(from_serial(f64::NAN), None);
    }

    #[test]
    fn test_integers() {
        assert_eq!(u8::from_cell(&CellValue::Float(42.0)).unwrap(), 42);
        assert_eq!(i32::from_cell(&CellValue::Text(" -7 ".into())).unwrap(), -7);
        assert!(u8::from_cell(&CellValue::Int(300)).is_err());
        assert!(i64::from_cell(&CellValue::Float(1.5)).is_err());
        assert!(i64::from_cell(&CellValue::Empty).is_err());
        assert_eq!(u64::MAX.to_cell(), CellValue::Float(u64::MAX as f64));
    }

    #[test]
    fn test_strings_from_numbers() {
        assert_eq!(String::from_cell(&CellValue::Float(13_800_138_000.0)).unwrap(), "13800138000");
        assert_eq!(String::from_cell(&CellValue::Float(0.25)).unwrap(), "0.25");
        assert_eq!(String::from_cell(&CellValue::Empty).unwrap(), "");
    }

    #[test]
    fn test_options_and_bools() {
        assert_eq!(Option::<u32>::from_cell(&CellValue::Text("  ".into())).unwrap(), None);
        assert_eq!(Option::<u32>::from_cell(&CellValue::Int(5)).unwrap(), Some(5));
        assert!(bool::from_cell(&CellValue::Text("YES".into())).unwrap());
        assert_eq!(None::<String>.to_cell(), CellValue::Empty);
    }

    #[test]
    fn test_text_dates() {
        let date = NaiveDate::from_cell(&CellValue::Text("2023/05/06".into())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 5, 6).unwrap());
        assert!(NaiveDateTime::from_cell(&CellValue::Text("soon".into())).is_err());
    }

    #[test]
    fn test_cell_at_past_end() {
        assert_eq!(cell_at(&[CellValue::Int(1)], 3), &CellValue::Empty);
    }

    proptest::proptest! {
        #[test]
        fn test_serial_round_trip_keeps_millis(days in 0_i64..80_000, millis in 0_i64..86_400_000) {
            let date = SERIAL_EPOCH.and_time(NaiveTime::MIN)
                + Duration::days(days)
                + Duration::milliseconds(millis);
            proptest::prop_assert_eq!(from_serial(to_serial(date)), Some(date));
        }
    }
}
