#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the toolkit crates.
//!
//! * [`jtool_error`] turns an enum into a context-aware error type.
//! * [`ExcelRow`] maps a struct onto workbook columns for `jtool-excel`.
//! * [`BeanCopy`] generates shallow field-by-field conversions between unrelated structs.
//!
//! Generated code refers to `::jtool_excel` for [`ExcelRow`]; depend on `jtool-excel` (which
//! re-exports the derive) rather than on this crate directly.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// A high-level attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field,
///   enabling the use of the `?` operator for upstream errors.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` implementations
///   if an `Internal` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping external errors must include a `source: T` field or a field marked
///    with `#[source]`/`#[from]`.
/// 4. Tuple or unit variants are rejected.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[jtool_derive::jtool_error]
/// pub enum ParseError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, ParseError> {
///     std::fs::read_to_string(path).context("Reading template")
/// }
/// ```
#[proc_macro_attribute]
pub fn jtool_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Derives `jtool_excel::ExcelRow` for a struct with named fields.
///
/// Sheet-level options live in `#[excel(...)]` on the struct, column options on each exported
/// field. Fields without an `#[excel]` attribute are not exported and are filled with
/// `Default::default()` on import.
///
/// | Struct option | Default |
/// |---|---|
/// | `sheet = ".."` | required |
/// | `kind = "xlsx" \| "xls"` | `"xlsx"` |
/// | `height = 30.0` | title row height in points |
/// | `font_name`, `font_size`, `bold`, `italic`, `color` | `"Arial"`, `16.0`, `true`, `false`, `0x000000` |
///
/// | Field option | Default |
/// |---|---|
/// | `index = N` | required |
/// | `name = ".."` | field name |
/// | `width = 20` | column width in characters |
/// | `format = ".."` | none |
/// | `font_name`, `font_size`, `bold`, `italic`, `color` | `"Arial"`, `11.0`, `false`, `false`, `0x000000` |
///
/// # Example
///
/// ```rust,ignore
/// use jtool_excel::ExcelRow;
///
/// #[derive(Debug, Default, ExcelRow)]
/// #[excel(sheet = "Users")]
/// struct User {
///     #[excel(index = 0, name = "Name")]
///     name: String,
///     #[excel(index = 1, name = "Score", format = "0.00")]
///     score: f64,
///     note: String,
/// }
/// ```
#[proc_macro_derive(ExcelRow, attributes(excel))]
pub fn derive_excel_row(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::excel::expand_derive(input).into()
}

/// Derives `From<&Source>` for every `#[bean(from = Source)]` listed on the struct.
///
/// Each field is read from the same-named source field, cloned and converted with `Into`.
/// `#[bean(rename = "other")]` reads a differently named field; `#[bean(skip)]` leaves the
/// field at `Default::default()`.
///
/// # Example
///
/// ```rust,ignore
/// use jtool_derive::BeanCopy;
///
/// struct UserEntity { id: u32, user_name: String, password: String }
///
/// #[derive(BeanCopy)]
/// #[bean(from = UserEntity)]
/// struct UserView {
///     id: u64,
///     #[bean(rename = "user_name")]
///     name: String,
///     #[bean(skip)]
///     avatar: Option<String>,
/// }
/// ```
#[proc_macro_derive(BeanCopy, attributes(bean))]
pub fn derive_bean_copy(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::bean::expand_derive(input).into()
}
