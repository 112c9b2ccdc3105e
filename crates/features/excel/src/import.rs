use crate::cell::from_serial;
use crate::{CellValue, ExcelError, ExcelErrorExt, ExcelRow};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::{debug, info};

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(d) => {
            from_serial(d.as_f64()).map_or(CellValue::Float(d.as_f64()), CellValue::DateTime)
        },
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn has_text(row: &[Data], text: &str) -> bool {
    row.iter().any(|d| matches!(d, Data::String(s) if s.trim() == text))
}

/// Index (relative to the range) of the first data row.
///
/// A title row followed by a header row puts the data after the header. Otherwise the first
/// header row alone marks the start; with no header at all every row is data.
fn data_start<E: ExcelRow>(rows: &[&[Data]]) -> usize {
    let is_header = |row: &[Data]| E::COLUMNS.iter().any(|c| has_text(row, c.name));

    for (i, pair) in rows.windows(2).enumerate() {
        if has_text(pair[0], E::SHEET.name) && is_header(pair[1]) {
            return i + 2;
        }
    }
    rows.iter().position(|row| is_header(row)).map_or(0, |i| i + 1)
}

fn rows_from_range<E: ExcelRow>(range: &Range<Data>) -> Result<Vec<E>, ExcelError> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let rows: Vec<&[Data]> = range.rows().collect();
    let start = data_start::<E>(&rows);
    debug!(sheet = E::SHEET.name, start, total = rows.len(), "located data rows");

    let mut out = Vec::with_capacity(rows.len().saturating_sub(start));
    for (offset, row) in rows.iter().enumerate().skip(start) {
        if row.iter().all(|d| matches!(d, Data::Empty) || matches!(d, Data::String(s) if s.trim().is_empty())) {
            continue;
        }
        let cells: Vec<CellValue> = E::COLUMNS
            .iter()
            .map(|c| {
                usize::from(c.index)
                    .checked_sub(first_col as usize)
                    .and_then(|i| row.get(i))
                    .map_or(CellValue::Empty, to_cell)
            })
            .collect();

        let excel_row = first_row as usize + offset;
        let value = E::from_cells(&cells).map_err(|err| match err {
            ExcelError::Conversion { message, context } => ExcelError::Import {
                row: excel_row,
                column: context.unwrap_or_default(),
                message,
                context: None,
            },
            other => other,
        })?;
        out.push(value);
    }
    Ok(out)
}

fn read_sheet<E: ExcelRow, RS: Read + Seek>(workbook: &mut Sheets<RS>) -> Result<Vec<E>, ExcelError> {
    let name = E::SHEET.name;
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Err(ExcelError::SheetNotFound { name: name.into(), context: None });
    }
    let range = workbook.worksheet_range(name).context(name)?;
    rows_from_range(&range)
}

/// Reads `E` rows from an `.xls` or `.xlsx` workbook in `reader`.
///
/// # Errors
/// * [`ExcelError::Read`] when the workbook cannot be opened.
/// * [`ExcelError::SheetNotFound`] when no sheet carries `E`'s sheet name.
/// * [`ExcelError::Import`] with the zero-based row and the column header of the first cell
///   that does not convert.
pub fn import<E, R>(reader: R) -> Result<Vec<E>, ExcelError>
where
    E: ExcelRow,
    R: Read + Seek + Clone,
{
    let mut workbook = open_workbook_auto_from_rs(reader).context("Opening workbook")?;
    let rows = read_sheet::<E, _>(&mut workbook)?;
    info!(sheet = E::SHEET.name, rows = rows.len(), "imported workbook");
    Ok(rows)
}

/// [`import`] from a file; the format is picked by extension.
///
/// # Errors
/// As [`import`].
pub fn import_from_path<E: ExcelRow>(path: impl AsRef<Path>) -> Result<Vec<E>, ExcelError> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path).context("Opening workbook")?;
    let rows = read_sheet::<E, _>(&mut workbook)?;
    info!(sheet = E::SHEET.name, path = %path.display(), rows = rows.len(), "imported workbook");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExcelRow;

    #[derive(Debug, Default, ExcelRow)]
    #[excel(sheet = "Users")]
    struct User {
        #[excel(index = 0, name = "Name")]
        name: String,
        #[excel(index = 1, name = "Age")]
        age: u32,
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_owned())
    }

    #[test]
    fn test_title_then_header() {
        let title = [text("Users"), Data::Empty];
        let header = [text("Name"), text("Age")];
        let data = [text("ada"), Data::Float(36.0)];
        let rows: Vec<&[Data]> = vec![&title, &header, &data];
        assert_eq!(data_start::<User>(&rows), 2);
    }

    #[test]
    fn test_header_only() {
        let header = [text("Name"), text("Age")];
        let data = [text("ada"), Data::Int(36)];
        let rows: Vec<&[Data]> = vec![&data, &header, &data];
        assert_eq!(data_start::<User>(&rows), 2);
        let rows: Vec<&[Data]> = vec![&data, &data];
        assert_eq!(data_start::<User>(&rows), 0);
    }

    #[test]
    fn test_conversion_from_data() {
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(to_cell(&text("x")), CellValue::Text("x".into()));
        assert_eq!(to_cell(&Data::Empty), CellValue::Empty);
        let user = User::from_cells(&[to_cell(&text("ada")), to_cell(&Data::Float(36.0))]).unwrap();
        assert_eq!((user.name.as_str(), user.age), ("ada", 36));
    }
}
