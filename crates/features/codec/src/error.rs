use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum CodecError {
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("XML serialize error{}: {source}", format_context(.context))]
    XmlSerialize { source: quick_xml::SeError, context: Option<Cow<'static, str>> },

    #[error("XML deserialize error{}: {source}", format_context(.context))]
    XmlDeserialize { source: quick_xml::DeError, context: Option<Cow<'static, str>> },
}
