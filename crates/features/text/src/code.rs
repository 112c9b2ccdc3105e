//! Random salts and verification codes.

use crate::TextError;
use rand::Rng;

const SALT_BYTES: usize = 8;

/// Base64 of eight random bytes.
///
/// # Errors
/// [`TextError::Internal`] when the OS random source fails.
pub fn salt() -> Result<String, TextError> {
    let bytes = jtool_crypto::random_bytes(SALT_BYTES).map_err(|e| TextError::Internal {
        message: e.to_string().into(),
        context: Some("salt".into()),
    })?;
    Ok(jtool_crypto::base64::encode(&bytes))
}

/// An `n`-digit numeric code that never starts with `0`.
///
/// # Errors
/// [`TextError::InvalidArgument`] when `n` is zero.
pub fn random_code(n: usize) -> Result<String, TextError> {
    if n == 0 {
        return Err(TextError::invalid("code length must be positive"));
    }
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(n);
    code.push(char::from(b'0' + rng.gen_range(1..=9)));
    for _ in 1..n {
        code.push(char::from(b'0' + rng.gen_range(0..=9)));
    }
    Ok(code)
}

/// One uppercase letter, one lowercase letter, then six digits, e.g. `Kq031945`.
#[must_use]
pub fn eight_random_code() -> String {
    let mut rng = rand::thread_rng();
    let mut code = String::with_capacity(8);
    code.push(char::from(rng.gen_range(b'A'..=b'Z')));
    code.push(char::from(rng.gen_range(b'a'..=b'z')));
    for _ in 0..6 {
        code.push(char::from(b'0' + rng.gen_range(0..=9)));
    }
    code
}
