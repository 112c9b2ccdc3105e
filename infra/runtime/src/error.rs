use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum RuntimeError {
    /// A pool or scheduler runtime could not be started.
    #[error("Runtime build error{}: {source}", format_context(.context))]
    Build { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid pool name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The pool's queue is full.
    #[error("Task rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid cron expression{}: {source}", format_context(.context))]
    InvalidCron { source: cron::error::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The task panicked or was aborted before producing a value.
    #[error("Task join error{}: {source}", format_context(.context))]
    Join { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },

    #[error("Internal runtime error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
