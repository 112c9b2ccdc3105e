//! AES-128/ECB/PKCS7 keyed from a password.
//!
//! The key is what a SHA1PRNG seeded with the password yields as its first 16 bytes:
//! `SHA1(SHA1(password))[..16]`. Ciphertext text is plain standard Base64.

use crate::{CryptoError, CryptoErrorExt};
use ::aes::Aes128;
use ::base64::Engine;
use ::base64::engine::general_purpose::STANDARD;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

const KEY_LEN: usize = 16;

type Encryptor = ecb::Encryptor<Aes128>;
type Decryptor = ecb::Decryptor<Aes128>;

fn derive_key(password: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let seed = Sha1::digest(password.as_bytes());
    let stream = Sha1::digest(seed);
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&stream[..KEY_LEN]);
    key
}

/// # Errors
/// Never in practice; the derived key always has a valid length.
pub fn encrypt_bytes(plain: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(password);
    let cipher = Encryptor::new_from_slice(key.as_slice())
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plain))
}

/// # Errors
/// [`CryptoError::Decryption`] for a wrong password or damaged input.
pub fn decrypt_bytes(cipher_text: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(password);
    let cipher = Decryptor::new_from_slice(key.as_slice())
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(cipher_text)
        .map_err(|_| CryptoError::decryption("bad padding; wrong password or corrupted data"))
}

/// Encrypts UTF-8 text and returns Base64.
///
/// # Errors
/// See [`encrypt_bytes`].
pub fn encrypt(plain: &str, password: &str) -> Result<String, CryptoError> {
    encrypt_bytes(plain.as_bytes(), password).map(|bytes| STANDARD.encode(bytes))
}

/// # Errors
/// [`CryptoError::Encoding`] for bad Base64, otherwise see [`decrypt_bytes`].
pub fn decrypt(cipher_b64: &str, password: &str) -> Result<String, CryptoError> {
    let bytes = STANDARD.decode(cipher_b64.trim()).context("aes ciphertext")?;
    crate::utf8(decrypt_bytes(&bytes, password)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_key_is_double_sha1_prefix() {
        // SHA1("abc") test vector.
        let key = derive_key("abc");
        let expected = Sha1::digest(hex!("a9993e364706816aba3e25717850c26c9cd0d89d"));
        assert_eq!(key.as_slice(), &expected[..16]);
    }

    #[test]
    fn test_roundtrip() -> Result<(), CryptoError> {
        let secret = encrypt("订单号: 42", "s3cret")?;
        assert_eq!(decrypt(&secret, "s3cret")?, "订单号: 42");
        Ok(())
    }

    #[test]
    fn test_block_aligned_output() -> Result<(), CryptoError> {
        assert_eq!(encrypt_bytes(b"", "k")?.len(), 16);
        assert_eq!(encrypt_bytes(&[1u8; 16], "k")?.len(), 32);
        Ok(())
    }

    #[test]
    fn test_wrong_password_fails() -> Result<(), CryptoError> {
        let secret = encrypt("payload that spans blocks", "right")?;
        let result = decrypt(&secret, "wrong");
        assert!(result.is_err() || result.is_ok_and(|s| s != "payload that spans blocks"));
        Ok(())
    }
}
