use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum SftpError {
    #[error("SSH error{}: {source}", format_context(.context))]
    Ssh { source: russh::Error, context: Option<Cow<'static, str>> },

    #[error("SFTP error{}: {source}", format_context(.context))]
    Sftp { source: russh_sftp::client::error::Error, context: Option<Cow<'static, str>> },

    #[error("Authentication failed for `{user}`{}", format_context(.context))]
    Auth { user: String, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal SFTP error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
