use crate::cell::to_serial;
use crate::{CellValue, ColumnSpec, ExcelError, ExcelErrorExt, ExcelKind, ExcelRow, FontSpec};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

const TITLE_ROW: u32 = 0;
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;
const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd";
const DEFAULT_DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

fn font_format(font: &FontSpec) -> Format {
    let mut format = Format::new()
        .set_font_name(font.name)
        .set_font_size(font.size)
        .set_font_color(Color::RGB(font.color));
    if font.bold {
        format = format.set_bold();
    }
    if font.italic {
        format = format.set_italic();
    }
    format
}

/// Per-column formats, built once per export.
struct ColumnFormats {
    header: Format,
    value: Format,
    date: Format,
    datetime: Format,
}

impl ColumnFormats {
    fn new(column: &ColumnSpec) -> Self {
        let header = font_format(&column.font)
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_border(FormatBorder::Thin);
        let base = font_format(&column.font);
        let value = column.format.map_or_else(|| base.clone(), |f| base.clone().set_num_format(f));
        let date = base.clone().set_num_format(column.format.unwrap_or(DEFAULT_DATE_FORMAT));
        let datetime = base.set_num_format(column.format.unwrap_or(DEFAULT_DATETIME_FORMAT));
        Self { header, value, date, datetime }
    }
}

/// Checks the row cap and builds the workbook in memory.
fn build<E: ExcelRow>(rows: &[E]) -> Result<Workbook, ExcelError> {
    let sheet = E::SHEET;
    if rows.is_empty() {
        return Err(ExcelError::Empty { context: Some(sheet.name.into()) });
    }
    let limit = sheet.kind.max_rows();
    let total = rows.len() + FIRST_DATA_ROW as usize;
    if total > limit {
        return Err(ExcelError::TooManyRows { rows: total, limit, context: Some(sheet.name.into()) });
    }
    if sheet.kind == ExcelKind::Xls {
        return Err(ExcelError::Unsupported {
            message: "legacy .xls output is not produced, use ExcelKind::Xlsx".into(),
            context: Some(sheet.name.into()),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.name).context("Naming worksheet")?;

    let formats: Vec<ColumnFormats> = E::COLUMNS.iter().map(ColumnFormats::new).collect();
    write_title::<E>(worksheet)?;
    write_headers(worksheet, E::COLUMNS, &formats)?;

    for (offset, row) in rows.iter().enumerate() {
        let excel_row = FIRST_DATA_ROW + offset as u32;
        for ((column, format), cell) in E::COLUMNS.iter().zip(&formats).zip(row.to_cells()) {
            write_cell(worksheet, excel_row, column.index, &cell, format)?;
        }
    }

    debug!(sheet = sheet.name, columns = E::COLUMNS.len(), rows = rows.len(), "workbook built");
    Ok(workbook)
}

fn write_title<E: ExcelRow>(worksheet: &mut Worksheet) -> Result<(), ExcelError> {
    let sheet = E::SHEET;
    let format = font_format(&sheet.font)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin);
    let first = E::COLUMNS.first().map_or(0, |c| c.index);
    let last = E::COLUMNS.last().map_or(0, |c| c.index);

    if last > first {
        worksheet.merge_range(TITLE_ROW, first, TITLE_ROW, last, sheet.name, &format)?;
    } else {
        worksheet.write_string_with_format(TITLE_ROW, first, sheet.name, &format)?;
    }
    worksheet.set_row_height(TITLE_ROW, sheet.height)?;
    Ok(())
}

fn write_headers(
    worksheet: &mut Worksheet,
    columns: &[ColumnSpec],
    formats: &[ColumnFormats],
) -> Result<(), ExcelError> {
    for (column, format) in columns.iter().zip(formats) {
        worksheet.write_string_with_format(HEADER_ROW, column.index, column.name, &format.header)?;
        worksheet.set_column_width(column.index, column.width)?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    formats: &ColumnFormats,
) -> Result<(), ExcelError> {
    let format = &formats.value;
    match cell {
        CellValue::Empty => worksheet.write_blank(row, col, format)?,
        CellValue::Bool(b) => worksheet.write_boolean_with_format(row, col, *b, format)?,
        CellValue::Int(i) => worksheet.write_number_with_format(row, col, *i as f64, format)?,
        CellValue::Float(f) => worksheet.write_number_with_format(row, col, *f, format)?,
        CellValue::Text(s) => worksheet.write_string_with_format(row, col, s, format)?,
        CellValue::Date(d) => {
            let serial = to_serial(d.and_time(chrono::NaiveTime::MIN));
            worksheet.write_number_with_format(row, col, serial, &formats.date)?
        },
        CellValue::DateTime(d) => {
            worksheet.write_number_with_format(row, col, to_serial(*d), &formats.datetime)?
        },
    };
    Ok(())
}

/// Serializes `rows` into an `.xlsx` file held in memory.
///
/// # Errors
/// * [`ExcelError::Empty`] for no rows.
/// * [`ExcelError::TooManyRows`] past the sheet kind's limit.
/// * [`ExcelError::Unsupported`] for sheets declared as `kind = "xls"`.
/// * [`ExcelError::Write`] when the workbook cannot be assembled.
pub fn export_to_buffer<E: ExcelRow>(rows: &[E]) -> Result<Vec<u8>, ExcelError> {
    let mut workbook = build(rows)?;
    Ok(workbook.save_to_buffer().context("Saving workbook")?)
}

/// Writes an `.xlsx` workbook to `writer`.
///
/// # Errors
/// As [`export_to_buffer`], plus [`ExcelError::Io`] when writing fails.
pub fn export<E: ExcelRow, W: Write>(rows: &[E], mut writer: W) -> Result<(), ExcelError> {
    let bytes = export_to_buffer(rows)?;
    writer.write_all(&bytes).context("Writing workbook")?;
    writer.flush()?;
    info!(sheet = E::SHEET.name, rows = rows.len(), bytes = bytes.len(), "exported workbook");
    Ok(())
}

/// Writes an `.xlsx` workbook to `path`, creating parent directories.
///
/// # Errors
/// As [`export`].
pub fn export_to_path<E: ExcelRow>(rows: &[E], path: impl AsRef<Path>) -> Result<(), ExcelError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Creating export directory")?;
    }
    let file = std::fs::File::create(path).context("Creating export file")?;
    export(rows, std::io::BufWriter::new(file))
}
