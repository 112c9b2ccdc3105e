use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum BeanError {
    #[error("Empty source{}: nothing to copy", format_context(.context))]
    EmptySource { context: Option<Cow<'static, str>> },

    #[error("Mapping error{}: {source}", format_context(.context))]
    Mapping { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal bean error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
