//! Serde-based JSON and XML conversion.

mod error;
pub mod json;
pub mod xml;

pub use crate::error::{CodecError, CodecErrorExt};
pub use crate::json::{from_json, from_json_list, to_json, to_json_pretty, to_snake_json, to_snake_value};
pub use crate::xml::{
    DEFAULT_ROOT, from_xml, from_xml_with_date_format, to_xml, to_xml_pretty, to_xml_with_date_format,
    xml_date,
};
