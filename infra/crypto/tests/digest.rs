use jtool_crypto::{CryptoError, digest};
use std::io::Write;

#[test]
fn test_md5_file_matches_text_digest() -> Result<(), CryptoError> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"The quick brown fox jumps over the lazy dog")?;
    file.flush()?;

    assert_eq!(digest::md5_file(file.path())?, "9e107d9d372bb6826bd81d3542a419d6");
    Ok(())
}

#[test]
fn test_missing_file_is_io_error() {
    let result = digest::md5_file("/definitely/not/here.bin");
    assert!(matches!(result, Err(CryptoError::Io { .. })));
}
