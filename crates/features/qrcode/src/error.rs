use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum QrError {
    #[error("Failed to encode QR code{}: {source}", format_context(.context))]
    Encode { source: qrcode::types::QrError, context: Option<Cow<'static, str>> },

    #[error("Failed to decode{}: {message}", format_context(.context))]
    Decode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Image error{}: {source}", format_context(.context))]
    Image { source: image::ImageError, context: Option<Cow<'static, str>> },

    #[error("Invalid font{}: {source}", format_context(.context))]
    Font { source: ab_glyph::InvalidFont, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> QrError {
    QrError::InvalidArgument { message: message.into(), context: None }
}
