use jtool_derive::jtool_error;
use std::borrow::Cow;

#[jtool_error]
pub enum ReadError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

fn read_missing() -> Result<String, ReadError> {
    std::fs::read_to_string("/definitely/not/here.txt").context("Reading fixture")
}

fn main() {
    let err = read_missing().unwrap_err();
    assert!(err.to_string().starts_with("IO error (Reading fixture): "));
}
