use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum HttpError {
    #[error("Request error{}: {source}", format_context(.context))]
    Request { source: reqwest::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid URL{}: {message}", format_context(.context))]
    InvalidUrl { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal HTTP error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
