//! DES helpers. ECB mode keys on the first 8 password bytes; CBC mode takes an exact
//! 8-byte key and the fixed IV `01..08`. All text uses the legacy [`crate::base64`] form.

use crate::{CryptoError, base64};
use ::des::Des;
use ecb::cipher::block_padding::Pkcs7;
use ecb::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};

/// Password used by [`encrypt`] and [`decrypt`].
pub const DEFAULT_PASSWORD: &str = "9588888888880288";

const KEY_LEN: usize = 8;
const IV: [u8; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

fn ecb_key(password: &str) -> Result<&[u8], CryptoError> {
    password.as_bytes().get(..KEY_LEN).ok_or_else(|| {
        CryptoError::invalid_key(format!("DES password needs at least {KEY_LEN} bytes"))
    })
}

fn cbc_key(key: &str) -> Result<&[u8], CryptoError> {
    if key.len() == KEY_LEN {
        Ok(key.as_bytes())
    } else {
        Err(CryptoError::invalid_key(format!("DES/CBC key must be exactly {KEY_LEN} bytes")))
    }
}

fn ecb_encrypt(data: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let cipher = ecb::Encryptor::<Des>::new_from_slice(ecb_key(password)?)
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
}

fn ecb_decrypt(data: &[u8], password: &str) -> Result<Vec<u8>, CryptoError> {
    let cipher = ecb::Decryptor::<Des>::new_from_slice(ecb_key(password)?)
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(data)
        .map_err(|_| CryptoError::decryption("bad DES padding"))
}

/// Encrypts with [`DEFAULT_PASSWORD`].
///
/// # Errors
/// Only if the default password were shorter than 8 bytes.
pub fn encrypt(data: &str) -> Result<String, CryptoError> {
    encrypt_with(data, DEFAULT_PASSWORD)
}

/// # Errors
/// Bad Base64, padding or UTF-8.
pub fn decrypt(data: &str) -> Result<String, CryptoError> {
    decrypt_with(data, DEFAULT_PASSWORD)
}

/// # Errors
/// [`CryptoError::InvalidKey`] for passwords under 8 bytes.
pub fn encrypt_with(data: &str, password: &str) -> Result<String, CryptoError> {
    ecb_encrypt(data.as_bytes(), password).map(|bytes| base64::encode(&bytes))
}

/// # Errors
/// [`CryptoError::InvalidKey`] for passwords under 8 bytes; bad Base64, padding or UTF-8.
pub fn decrypt_with(data: &str, password: &str) -> Result<String, CryptoError> {
    crate::utf8(ecb_decrypt(&base64::decode(data)?, password)?)
}

/// # Errors
/// [`CryptoError::InvalidKey`] unless `key` is exactly 8 bytes.
pub fn encrypt_cbc(data: &str, key: &str) -> Result<String, CryptoError> {
    let cipher = cbc::Encryptor::<Des>::new_from_slices(cbc_key(key)?, &IV)
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    Ok(base64::encode(&cipher.encrypt_padded_vec_mut::<Pkcs7>(data.as_bytes())))
}

/// # Errors
/// [`CryptoError::InvalidKey`] unless `key` is exactly 8 bytes; bad Base64, padding or UTF-8.
pub fn decrypt_cbc(data: &str, key: &str) -> Result<String, CryptoError> {
    let cipher = cbc::Decryptor::<Des>::new_from_slices(cbc_key(key)?, &IV)
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    let plain = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&base64::decode(data)?)
        .map_err(|_| CryptoError::decryption("bad DES/CBC padding"))?;
    crate::utf8(plain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_password_roundtrip() -> Result<(), CryptoError> {
        let text = encrypt("jackie")?;
        assert_eq!(decrypt(&text)?, "jackie");
        Ok(())
    }

    #[test]
    fn test_only_first_eight_bytes_matter() -> Result<(), CryptoError> {
        let a = encrypt_with("same", "12345678aaaa")?;
        let b = encrypt_with("same", "12345678bbbb")?;
        assert_eq!(a, b);
        assert_eq!(decrypt_with(&a, "12345678")?, "same");
        Ok(())
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(encrypt_with("x", "1234567"), Err(CryptoError::InvalidKey { .. })));
    }

    #[test]
    fn test_cbc_roundtrip_and_key_length() -> Result<(), CryptoError> {
        let text = encrypt_cbc("cbc mode", "abcdefgh")?;
        assert_eq!(decrypt_cbc(&text, "abcdefgh")?, "cbc mode");
        assert_ne!(text, encrypt_with("cbc mode", "abcdefgh")?);
        assert!(encrypt_cbc("x", "abcdefghi").is_err());
        Ok(())
    }
}
