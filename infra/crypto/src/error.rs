//! # Crypto errors

use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum CryptoError {
    #[error("Encryption error{}: {message}", format_context(.context))]
    Encryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wrong key, corrupted ciphertext or bad padding.
    #[error("Decryption error{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Key material has the wrong length or cannot be parsed.
    #[error("Invalid key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Input was not valid Base64.
    #[error("Encoding error{}: {source}", format_context(.context))]
    Encoding { source: ::base64::DecodeError, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal crypto error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CryptoError {
    pub(crate) fn decryption(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Decryption { message: message.into(), context: None }
    }

    pub(crate) fn invalid_key(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidKey { message: message.into(), context: None }
    }
}
