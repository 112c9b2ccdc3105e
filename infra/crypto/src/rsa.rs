//! Chunked RSA over PKCS#1 v1.5.
//!
//! Keys travel as legacy Base64 of their DER form (X.509 SPKI for public keys, PKCS#8 for
//! private keys). Plaintext is split into `k - 11` byte blocks for encryption and
//! ciphertext into `k` byte blocks for decryption, `k` being the modulus size in bytes.

use crate::{CryptoError, base64};
use ::rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey};
use ::rsa::traits::PublicKeyParts;
use ::rsa::{BigUint, Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use tracing::debug;
use zeroize::Zeroizing;

pub use ::rsa::{RsaPrivateKey as PrivateKey, RsaPublicKey as PublicKey};

const MIN_KEY_BITS: usize = 512;
/// PKCS#1 v1.5 overhead per block.
const PADDING_OVERHEAD: usize = 11;

/// Base64 DER encodings of a freshly generated pair.
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: String,
    pub private_key: Zeroizing<String>,
}

/// # Errors
/// [`CryptoError::InvalidKey`] for sizes under 512 bits or failed generation.
pub fn create_keys(bits: usize) -> Result<RsaKeyPair, CryptoError> {
    if bits < MIN_KEY_BITS {
        return Err(CryptoError::invalid_key(format!("RSA keys need at least {MIN_KEY_BITS} bits")));
    }
    let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits)
        .map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    let public = RsaPublicKey::from(&private);

    let public_der =
        public.to_public_key_der().map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    let private_der = private.to_pkcs8_der().map_err(|e| CryptoError::invalid_key(e.to_string()))?;
    debug!(bits, "generated rsa key pair");

    Ok(RsaKeyPair {
        public_key: base64::encode(public_der.as_bytes()),
        private_key: Zeroizing::new(base64::encode(private_der.as_bytes())),
    })
}

/// # Errors
/// Bad Base64 or DER.
pub fn public_key(encoded: &str) -> Result<RsaPublicKey, CryptoError> {
    RsaPublicKey::from_public_key_der(&base64::decode(encoded)?)
        .map_err(|e| CryptoError::invalid_key(format!("public key: {e}")))
}

/// # Errors
/// Bad Base64 or DER.
pub fn private_key(encoded: &str) -> Result<RsaPrivateKey, CryptoError> {
    let der = Zeroizing::new(base64::decode(encoded)?);
    RsaPrivateKey::from_pkcs8_der(&der)
        .map_err(|e| CryptoError::invalid_key(format!("private key: {e}")))
}

/// # Errors
/// [`CryptoError::Encryption`] if a block cannot be encrypted.
pub fn public_encrypt(data: &str, key: &RsaPublicKey) -> Result<String, CryptoError> {
    let mut rng = rand::thread_rng();
    let mut out = Vec::new();
    for block in data.as_bytes().chunks(key.size() - PADDING_OVERHEAD) {
        let sealed = key.encrypt(&mut rng, Pkcs1v15Encrypt, block).map_err(|e| {
            CryptoError::Encryption { message: e.to_string().into(), context: None }
        })?;
        out.extend_from_slice(&sealed);
    }
    Ok(base64::encode(&out))
}

/// # Errors
/// [`CryptoError::Decryption`] for the wrong key or damaged blocks.
pub fn private_decrypt(data: &str, key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let mut out = Vec::new();
    for block in base64::decode(data)?.chunks(key.size()) {
        let plain = key
            .decrypt(Pkcs1v15Encrypt, block)
            .map_err(|e| CryptoError::decryption(e.to_string()))?;
        out.extend_from_slice(&plain);
    }
    crate::utf8(out)
}

/// Encrypts with the private key using type-1 padding and no digest prefix, so any
/// holder of the public key can recover the text with [`public_decrypt`].
///
/// # Errors
/// [`CryptoError::Encryption`] if a block cannot be processed.
pub fn private_encrypt(data: &str, key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let mut out = Vec::new();
    for block in data.as_bytes().chunks(key.size() - PADDING_OVERHEAD) {
        let sealed = key.sign(Pkcs1v15Sign::new_unprefixed(), block).map_err(|e| {
            CryptoError::Encryption { message: e.to_string().into(), context: None }
        })?;
        out.extend_from_slice(&sealed);
    }
    Ok(base64::encode(&out))
}

/// # Errors
/// [`CryptoError::Decryption`] when a block does not carry valid type-1 padding.
pub fn public_decrypt(data: &str, key: &RsaPublicKey) -> Result<String, CryptoError> {
    let size = key.size();
    let mut out = Vec::new();
    for block in base64::decode(data)?.chunks(size) {
        let m = BigUint::from_bytes_be(block).modpow(key.e(), key.n());
        let bytes = m.to_bytes_be();
        if bytes.len() >= size {
            return Err(CryptoError::decryption("block larger than modulus"));
        }
        // The leading 0x00 is dropped by the big-integer conversion.
        let mut padded = vec![0u8; size - bytes.len()];
        padded.extend_from_slice(&bytes);
        out.extend_from_slice(strip_type1(&padded)?);
    }
    crate::utf8(out)
}

/// Strips `00 01 FF.. 00` and returns the message.
fn strip_type1(block: &[u8]) -> Result<&[u8], CryptoError> {
    let [0x00, 0x01, rest @ ..] = block else {
        return Err(CryptoError::decryption("missing type-1 header"));
    };
    let fill = rest.iter().take_while(|b| **b == 0xFF).count();
    match rest.get(fill) {
        Some(0x00) if fill >= 8 => Ok(&rest[fill + 1..]),
        _ => Err(CryptoError::decryption("malformed type-1 padding")),
    }
}

/// SHA1withRSA signature in legacy Base64.
///
/// # Errors
/// [`CryptoError::Encryption`] if signing fails.
pub fn sign_sha1(data: &str, key: &RsaPrivateKey) -> Result<String, CryptoError> {
    let hashed = Sha1::digest(data.as_bytes());
    let signature = key
        .sign(Pkcs1v15Sign::new::<Sha1>(), &hashed)
        .map_err(|e| CryptoError::Encryption { message: e.to_string().into(), context: None })?;
    Ok(base64::encode(&signature))
}

/// `false` for malformed signatures as well as mismatches.
#[must_use]
pub fn verify_sha1(data: &str, signature: &str, key: &RsaPublicKey) -> bool {
    let Ok(signature) = base64::decode(signature) else {
        return false;
    };
    let hashed = Sha1::digest(data.as_bytes());
    key.verify(Pkcs1v15Sign::new::<Sha1>(), &hashed, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_keys_rejected() {
        assert!(matches!(create_keys(256), Err(CryptoError::InvalidKey { .. })));
    }

    #[test]
    fn test_strip_type1() {
        let mut block = vec![0x00, 0x01];
        block.extend([0xFF; 8]);
        block.push(0x00);
        block.extend(b"hi");
        assert_eq!(strip_type1(&block).unwrap(), b"hi");
    }

    #[test]
    fn test_strip_type1_rejects_short_fill() {
        assert!(strip_type1(&[0x00, 0x01, 0xFF, 0x00, b'x']).is_err());
        assert!(strip_type1(&[0x00, 0x02, 0xFF]).is_err());
    }
}
