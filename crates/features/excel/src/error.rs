use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum ExcelError {
    #[error("Export error{}: export data is null", format_context(.context))]
    Empty { context: Option<Cow<'static, str>> },

    #[error("Export error{}: {rows} rows exceed the {limit} row limit", format_context(.context))]
    TooManyRows { rows: usize, limit: usize, context: Option<Cow<'static, str>> },

    #[error("Unsupported{}: {message}", format_context(.context))]
    Unsupported { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Sheet not found{}: {name}", format_context(.context))]
    SheetNotFound { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A cell could not be converted to a field type. The context names the column.
    #[error("Cell conversion error{}: {message}", format_context(.context))]
    Conversion { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Import error at row {row}, column `{column}`{}: {message}", format_context(.context))]
    Import {
        row: usize,
        column: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Workbook write error{}: {source}", format_context(.context))]
    Write { source: rust_xlsxwriter::XlsxError, context: Option<Cow<'static, str>> },

    #[error("Workbook read error{}: {source}", format_context(.context))]
    Read { source: calamine::Error, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal excel error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ExcelError {
    pub(crate) fn conversion(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conversion { message: message.into(), context: None }
    }
}
