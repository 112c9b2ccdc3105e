//! Random passwords built from unambiguous characters.

use crate::TextError;
use rand::Rng;
use rand::seq::SliceRandom;

/// Letters without `i`, `l`, `o` and their capitals.
pub const WORDS: &[u8] = b"abcdefghjkmnpqrstuvwxyzABCDEFGHJKMNPQRSTUVWXYZ";
/// Digits without `0` and `1`.
pub const DIGITS: &[u8] = b"23456789";
pub const SYMBOLS: &[u8] = b"%$#.?@&*!~";

const MIN_LENGTH: usize = 8;
const DEFAULT_EXTRA: usize = 8;

fn pick(rng: &mut impl Rng, class: &[u8]) -> char {
    class.choose(rng).copied().map_or('x', char::from)
}

fn build(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let class = match rng.gen_range(0..3) {
                0 => DIGITS,
                1 => WORDS,
                _ => SYMBOLS,
            };
            pick(&mut rng, class)
        })
        .collect()
}

/// A password of 8 to 15 characters mixing digits, letters and symbols.
#[must_use]
pub fn random_password() -> String {
    let length = MIN_LENGTH + rand::thread_rng().gen_range(0..DEFAULT_EXTRA);
    build(length)
}

/// A password of `8 + rand(0..extra)` characters.
///
/// # Errors
/// [`TextError::InvalidArgument`] when `extra` is zero.
pub fn random_password_with(extra: usize) -> Result<String, TextError> {
    if extra == 0 {
        return Err(TextError::invalid("extra length must be positive"));
    }
    let length = MIN_LENGTH + rand::thread_rng().gen_range(0..extra);
    Ok(build(length))
}

/// `length` characters drawn from [`DIGITS`] and [`WORDS`].
#[must_use]
pub fn random_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let class = if rng.gen_bool(0.5) { DIGITS } else { WORDS };
            pick(&mut rng, class)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(c: char) -> bool {
        let byte = c as u32;
        u8::try_from(byte).is_ok_and(|b| DIGITS.contains(&b) || WORDS.contains(&b) || SYMBOLS.contains(&b))
    }

    #[test]
    fn test_password_length_and_alphabet() {
        for _ in 0..200 {
            let password = random_password();
            assert!((8..=15).contains(&password.len()), "{password}");
            assert!(password.chars().all(allowed), "{password}");
        }
    }

    #[test]
    fn test_password_with_extra() {
        assert!(random_password_with(0).is_err());
        for _ in 0..50 {
            let password = random_password_with(3).unwrap();
            assert!((8..=10).contains(&password.len()));
        }
    }

    #[test]
    fn test_random_string_has_no_symbols() {
        let s = random_string(64);
        assert_eq!(s.len(), 64);
        assert!(s.bytes().all(|b| DIGITS.contains(&b) || WORDS.contains(&b)));
        assert!(!s.contains(['i', 'l', 'o', 'I', 'L', 'O', '0', '1']));
    }
}
