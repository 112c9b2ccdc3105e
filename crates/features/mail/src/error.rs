use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum MailError {
    #[error("Invalid mail address{}: {source}", format_context(.context))]
    Address { source: lettre::address::AddressError, context: Option<Cow<'static, str>> },

    #[error("Failed to build message{}: {source}", format_context(.context))]
    Build { source: lettre::error::Error, context: Option<Cow<'static, str>> },

    #[error("SMTP error{}: {source}", format_context(.context))]
    Transport { source: lettre::transport::smtp::Error, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("No recipients{}", format_context(.context))]
    NoRecipients { context: Option<Cow<'static, str>> },

    #[error("Internal mail error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
