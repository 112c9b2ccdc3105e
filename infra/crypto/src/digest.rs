//! Lowercase hex digests.

use crate::{CryptoError, CryptoErrorExt};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_BUF: usize = 64 * 1024;

#[must_use]
pub fn md5_hex(text: &str) -> String {
    md5_hex_bytes(text.as_bytes())
}

#[must_use]
pub fn md5_hex_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Streams `reader` through MD5.
///
/// # Errors
/// [`CryptoError::Io`] if reading fails.
pub fn md5_reader<R: Read>(mut reader: R) -> Result<String, CryptoError> {
    let mut hasher = Md5::new();
    let mut buf = vec![0u8; READ_BUF];
    loop {
        let read = reader.read(&mut buf).context("reading md5 input")?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// # Errors
/// [`CryptoError::Io`] if the file cannot be opened or read.
pub fn md5_file(path: impl AsRef<Path>) -> Result<String, CryptoError> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("opening {}", path.display()))?;
    md5_reader(BufReader::new(file))
}

#[must_use]
pub fn sha256_hex(text: &str) -> String {
    hex::encode(<sha2::Sha256 as sha2::Digest>::digest(text.as_bytes()))
}
