use std::borrow::Cow;

#[jtool_derive::jtool_error]
pub enum LockError {
    #[error("Redis error{}: {source}", format_context(.context))]
    Redis { source: redis::RedisError, context: Option<Cow<'static, str>> },

    #[error("Invalid argument{}: {message}", format_context(.context))]
    InvalidArgument { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
