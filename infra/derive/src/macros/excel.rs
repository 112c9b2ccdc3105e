use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Lit, LitStr, Type};

const DEFAULT_FONT: &str = "Arial";
const DEFAULT_WIDTH: u16 = 20;
const DEFAULT_TITLE_HEIGHT: f64 = 30.0;
const DEFAULT_TITLE_FONT_SIZE: f64 = 16.0;
const DEFAULT_CELL_FONT_SIZE: f64 = 11.0;

struct Font {
    name: String,
    size: f64,
    bold: bool,
    italic: bool,
    color: u32,
}

impl Font {
    fn title() -> Self {
        Self { name: DEFAULT_FONT.to_owned(), size: DEFAULT_TITLE_FONT_SIZE, bold: true, italic: false, color: 0 }
    }

    fn cell() -> Self {
        Self { name: DEFAULT_FONT.to_owned(), size: DEFAULT_CELL_FONT_SIZE, bold: false, italic: false, color: 0 }
    }

    /// Consumes a font option if `meta` names one; returns `false` for anything else.
    fn apply(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
        if meta.path.is_ident("font_name") {
            self.name = meta.value()?.parse::<LitStr>()?.value();
        } else if meta.path.is_ident("font_size") {
            self.size = parse_f64(meta)?;
        } else if meta.path.is_ident("bold") {
            self.bold = meta.value()?.parse::<syn::LitBool>()?.value;
        } else if meta.path.is_ident("italic") {
            self.italic = meta.value()?.parse::<syn::LitBool>()?.value;
        } else if meta.path.is_ident("color") {
            self.color = meta.value()?.parse::<syn::LitInt>()?.base10_parse()?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    fn tokens(&self) -> TokenStream {
        let Self { name, size, bold, italic, color } = self;
        quote! {
            ::jtool_excel::FontSpec { name: #name, size: #size, bold: #bold, italic: #italic, color: #color }
        }
    }
}

struct Sheet {
    name: Option<LitStr>,
    xls: bool,
    height: f64,
    font: Font,
}

struct Column {
    ident: Ident,
    ty: Type,
    index: u16,
    name: String,
    width: u16,
    format: Option<String>,
    font: Font,
}

pub fn expand_derive(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "ExcelRow only supports structs"));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ExcelRow only supports structs with named fields",
        ));
    };

    let sheet = parse_sheet(&input.attrs)?;
    let Some(sheet_name) = &sheet.name else {
        return Err(syn::Error::new_spanned(&input.ident, "missing `#[excel(sheet = \"...\")]`"));
    };

    let mut columns = Vec::new();
    let mut skipped = Vec::new();
    let mut seen = FxHashSet::default();
    for field in &fields.named {
        let Some(ident) = field.ident.clone() else { continue };
        match parse_column(field, &ident)? {
            Some(column) => {
                if !seen.insert(column.index) {
                    return Err(syn::Error::new_spanned(
                        field,
                        format!("duplicate excel index {}", column.index),
                    ));
                }
                columns.push(column);
            },
            None => skipped.push(ident),
        }
    }

    if columns.is_empty() {
        return Err(syn::Error::new_spanned(&input.ident, "can not find any excel field"));
    }
    columns.sort_by_key(|c| c.index);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let kind = if sheet.xls {
        quote! { ::jtool_excel::ExcelKind::Xls }
    } else {
        quote! { ::jtool_excel::ExcelKind::Xlsx }
    };
    let height = sheet.height;
    let sheet_font = sheet.font.tokens();

    let specs = columns.iter().map(|c| {
        let index = c.index;
        let header = &c.name;
        let width = c.width;
        let format = c.format.as_ref().map_or_else(|| quote! { None }, |f| quote! { Some(#f) });
        let font = c.font.tokens();
        quote! {
            ::jtool_excel::ColumnSpec { index: #index, name: #header, width: #width, format: #format, font: #font }
        }
    });

    let to_cells = columns.iter().map(|c| {
        let ident = &c.ident;
        quote! { ::jtool_excel::IntoCell::to_cell(&self.#ident) }
    });

    let from_cells = columns.iter().enumerate().map(|(position, c)| {
        let ident = &c.ident;
        let ty = &c.ty;
        let context = &c.name;
        quote! {
            #ident: ::jtool_excel::ExcelErrorExt::context(
                <#ty as ::jtool_excel::FromCell>::from_cell(::jtool_excel::cell_at(cells, #position)),
                #context,
            )?
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::jtool_excel::ExcelRow for #name #ty_generics #where_clause {
            const SHEET: ::jtool_excel::SheetSpec = ::jtool_excel::SheetSpec {
                name: #sheet_name,
                kind: #kind,
                height: #height,
                font: #sheet_font,
            };

            const COLUMNS: &'static [::jtool_excel::ColumnSpec] = &[#(#specs),*];

            fn to_cells(&self) -> ::std::vec::Vec<::jtool_excel::CellValue> {
                ::std::vec![#(#to_cells),*]
            }

            fn from_cells(cells: &[::jtool_excel::CellValue]) -> ::core::result::Result<Self, ::jtool_excel::ExcelError> {
                ::core::result::Result::Ok(Self {
                    #(#from_cells,)*
                    #(#skipped: ::core::default::Default::default(),)*
                })
            }
        }
    })
}

fn parse_sheet(attrs: &[Attribute]) -> syn::Result<Sheet> {
    let mut sheet =
        Sheet { name: None, xls: false, height: DEFAULT_TITLE_HEIGHT, font: Font::title() };

    for attr in attrs.iter().filter(|a| a.path().is_ident("excel")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("sheet") {
                sheet.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("kind") {
                let kind: LitStr = meta.value()?.parse()?;
                sheet.xls = match kind.value().to_ascii_lowercase().as_str() {
                    "xlsx" => false,
                    "xls" => true,
                    _ => return Err(meta.error("kind must be \"xlsx\" or \"xls\"")),
                };
            } else if meta.path.is_ident("height") {
                sheet.height = parse_f64(&meta)?;
            } else if !sheet.font.apply(&meta)? {
                return Err(meta.error("unsupported excel sheet option"));
            }
            Ok(())
        })?;
    }

    Ok(sheet)
}

fn parse_column(field: &syn::Field, ident: &Ident) -> syn::Result<Option<Column>> {
    let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("excel")) else {
        return Ok(None);
    };

    let mut index = None;
    let mut name = None;
    let mut width = DEFAULT_WIDTH;
    let mut format = None;
    let mut font = Font::cell();

    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("index") {
            index = Some(meta.value()?.parse::<syn::LitInt>()?.base10_parse::<u16>()?);
        } else if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if meta.path.is_ident("width") {
            width = meta.value()?.parse::<syn::LitInt>()?.base10_parse()?;
        } else if meta.path.is_ident("format") {
            format = Some(meta.value()?.parse::<LitStr>()?.value());
        } else if !font.apply(&meta)? {
            return Err(meta.error("unsupported excel column option"));
        }
        Ok(())
    })?;

    let Some(index) = index else {
        return Err(syn::Error::new_spanned(attr, "excel field is missing `index = N`"));
    };

    Ok(Some(Column {
        ident: ident.clone(),
        ty: field.ty.clone(),
        index,
        name: name.unwrap_or_else(|| ident.to_string()),
        width,
        format,
        font,
    }))
}

fn parse_f64(meta: &ParseNestedMeta<'_>) -> syn::Result<f64> {
    match meta.value()?.parse::<Lit>()? {
        Lit::Float(lit) => lit.base10_parse(),
        Lit::Int(lit) => lit.base10_parse::<u32>().map(f64::from),
        other => Err(syn::Error::new_spanned(other, "expected a number")),
    }
}
