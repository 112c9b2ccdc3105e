use jtool_logger::{Logger, LoggerError};

#[test]
fn test_second_init_fails() -> Result<(), LoggerError> {
    let _first = Logger::builder().name("first").init()?;
    let second = Logger::builder().name("second").init();
    assert!(matches!(second, Err(LoggerError::Subscriber { .. })));
    Ok(())
}
