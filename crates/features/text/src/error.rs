use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum TextError {
    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A number pattern could not be understood.
    #[error("Pattern error{}: {message}", format_context(.context))]
    Pattern { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal text error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl TextError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument { message: message.into(), context: None }
    }
}
