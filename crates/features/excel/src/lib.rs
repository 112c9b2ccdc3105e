//! Excel export and import driven by `#[derive(ExcelRow)]`.
//!
//! A row type describes its sheet and columns at compile time. [`export`] writes a title row,
//! a header row and one row per value; [`import`] finds the header again and converts each
//! data row back with [`FromCell`].
//!
//! ```rust,ignore
//! use jtool_excel::ExcelRow;
//!
//! #[derive(Debug, Default, ExcelRow)]
//! #[excel(sheet = "Staff")]
//! struct Staff {
//!     #[excel(index = 0, name = "Name", width = 16)]
//!     name: String,
//!     #[excel(index = 1, name = "Salary", format = "#,##0.00")]
//!     salary: f64,
//! }
//!
//! let bytes = jtool_excel::export_to_buffer(&staff)?;
//! let back: Vec<Staff> = jtool_excel::import(std::io::Cursor::new(bytes))?;
//! ```

extern crate self as jtool_excel;

mod cell;
mod error;
mod export;
mod import;

pub use crate::cell::{CellValue, FromCell, IntoCell, cell_at};
pub use crate::error::{ExcelError, ExcelErrorExt};
pub use crate::export::{export, export_to_buffer, export_to_path};
pub use crate::import::{import, import_from_path};
pub use jtool_derive::ExcelRow;

/// Row limit of the legacy `.xls` format, header rows included.
pub const XLS_MAX_ROWS: usize = 65_536;
/// Row limit of `.xlsx`, header rows included.
pub const XLSX_MAX_ROWS: usize = 1_048_576;

/// Workbook flavour a row type targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExcelKind {
    #[default]
    Xlsx,
    Xls,
}

impl ExcelKind {
    #[must_use]
    pub const fn max_rows(self) -> usize {
        match self {
            Self::Xlsx => XLSX_MAX_ROWS,
            Self::Xls => XLS_MAX_ROWS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSpec {
    pub name: &'static str,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    /// `0xRRGGBB`.
    pub color: u32,
}

/// Sheet-level options: the sheet name doubles as the title text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSpec {
    pub name: &'static str,
    pub kind: ExcelKind,
    /// Title row height in points.
    pub height: f64,
    pub font: FontSpec,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    /// Zero-based worksheet column.
    pub index: u16,
    /// Header text.
    pub name: &'static str,
    /// Width in characters.
    pub width: u16,
    /// Excel number format for data cells.
    pub format: Option<&'static str>,
    pub font: FontSpec,
}

/// A struct that maps onto one worksheet.
///
/// `COLUMNS` is sorted by `index`; `to_cells` and `from_cells` use the same order.
pub trait ExcelRow: Sized {
    const SHEET: SheetSpec;
    const COLUMNS: &'static [ColumnSpec];

    fn to_cells(&self) -> Vec<CellValue>;

    /// # Errors
    /// [`ExcelError::Conversion`] naming the column whose cell does not fit its field.
    fn from_cells(cells: &[CellValue]) -> Result<Self, ExcelError>;

    #[must_use]
    fn sheet() -> SheetSpec {
        Self::SHEET
    }

    #[must_use]
    fn columns() -> &'static [ColumnSpec] {
        Self::COLUMNS
    }
}
