//! Base64 as written by older Java tooling: standard alphabet, padded, with a space after
//! every 60 characters produced from complete 3-byte groups. Decoding ignores whitespace.

use crate::{CryptoError, CryptoErrorExt};
use ::base64::Engine;
use ::base64::alphabet::STANDARD;
use ::base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Bytes per space-terminated block (15 groups of 3).
const BLOCK_BYTES: usize = 45;
const BLOCK_CHARS: usize = 60;

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[must_use]
pub fn encode(data: &[u8]) -> String {
    let plain = ::base64::engine::general_purpose::STANDARD.encode(data);
    let breaks = data.len() / BLOCK_BYTES;
    if breaks == 0 {
        return plain;
    }

    let mut out = String::with_capacity(plain.len() + breaks);
    for block in 0..breaks {
        out.push_str(&plain[block * BLOCK_CHARS..(block + 1) * BLOCK_CHARS]);
        out.push(' ');
    }
    out.push_str(&plain[breaks * BLOCK_CHARS..]);
    out
}

/// # Errors
/// [`CryptoError::Encoding`] for characters outside the alphabet.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    let compact: String = text.chars().filter(|c| *c > ' ').collect();
    LENIENT.decode(compact).context("decoding base64")
}

#[must_use]
pub fn encode_str(text: &str) -> String {
    encode(text.as_bytes())
}

/// # Errors
/// [`CryptoError::Encoding`] for bad input, [`CryptoError::Decryption`] when the bytes are not
/// UTF-8.
pub fn decode_str(text: &str) -> Result<String, CryptoError> {
    crate::utf8(decode(text)?)
}
