//! # jtool crypto
//!
//! Symmetric and asymmetric ciphers that stay wire-compatible with text produced by older
//! systems: password-seeded AES keys, DES with an 8-byte key prefix, chunked RSA and a
//! Base64 dialect that breaks long output with spaces.
//!
//! ```rust
//! # fn main() -> Result<(), jtool_crypto::CryptoError> {
//! let secret = jtool_crypto::aes::encrypt("hello", "p@ss")?;
//! assert_eq!(jtool_crypto::aes::decrypt(&secret, "p@ss")?, "hello");
//! # Ok(())
//! # }
//! ```

pub mod aes;
pub mod base64;
pub mod des;
pub mod digest;
mod error;
pub mod rsa;

pub use crate::error::{CryptoError, CryptoErrorExt};

/// Fills a buffer of `len` bytes from the OS random source.
///
/// # Errors
/// [`CryptoError::Internal`] when the OS source is unavailable.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut buf = vec![0u8; len];
    getrandom::fill(&mut buf).map_err(|e| CryptoError::Internal {
        message: e.to_string().into(),
        context: Some("reading OS randomness".into()),
    })?;
    Ok(buf)
}

/// Decodes UTF-8 plaintext recovered by a cipher.
pub(crate) fn utf8(bytes: Vec<u8>) -> Result<String, CryptoError> {
    String::from_utf8(bytes).map_err(|e| CryptoError::decryption(format!("plaintext is not UTF-8: {e}")))
}
