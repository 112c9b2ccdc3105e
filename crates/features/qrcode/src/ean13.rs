//! EAN-13 check digits and bar images.
//!
//! A symbol is 95 modules wide: start guard, six left digits, centre guard, six right digits,
//! end guard. The first digit is not drawn; it selects which left digits use the G set.

use crate::error::{QrError, QrErrorExt, invalid};
use crate::{create_parent, write_png};
use image::{ExtendedColorType, GrayImage, Luma};
use std::io::Write;
use std::path::Path;
use tracing::instrument;

pub const DEFAULT_WIDTH: u32 = 220;
pub const DEFAULT_HEIGHT: u32 = 120;
pub const SYMBOL_MODULES: u32 = 95;
/// Blank modules on each side.
const QUIET_ZONE: u32 = 9;

const START_GUARD: &str = "101";
const CENTRE_GUARD: &str = "01010";
const END_GUARD: &str = "101";

const L_CODES: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011",
    "0110001", "0101111", "0111011", "0110111", "0001011",
];
const G_CODES: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101",
    "0111001", "0000101", "0010001", "0001001", "0010111",
];
const R_CODES: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100",
    "1001110", "1010000", "1000100", "1001000", "1110100",
];
const PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];

fn digits(text: &str) -> Result<Vec<usize>, QrError> {
    text.chars()
        .map(|c| c.to_digit(10).map(|d| d as usize))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| invalid(format!("`{text}` contains a non-digit")))
}

/// Check digit over `digits`, weighting every other digit by 3 starting from the rightmost.
pub fn checksum(digits_text: &str) -> Result<u8, QrError> {
    let values = digits(digits_text)?;
    let (odd, even) = values.iter().rev().enumerate().fold((0, 0), |(odd, even), (i, d)| {
        if i % 2 == 0 { (odd + d, even) } else { (odd, even + d) }
    });
    let check = (10 - (3 * odd + even) % 10) % 10;
    u8::try_from(check).map_err(|_| invalid("checksum out of range"))
}

/// Whether the last digit is the check digit of the rest. Empty or non-numeric input is `false`.
pub fn check_checksum(code: &str) -> bool {
    let Some(last) = code.chars().last() else {
        return false;
    };
    let Some(expected) = last.to_digit(10) else {
        return false;
    };
    checksum(&code[..code.len() - last.len_utf8()]).is_ok_and(|c| u32::from(c) == expected)
}

/// Appends the check digit to a 12-digit prefix.
pub fn bar_code(prefix: &str) -> Result<String, QrError> {
    if prefix.is_empty() {
        return Err(invalid("bar code prefix is empty"));
    }
    if prefix.chars().count() != 12 {
        return Err(invalid(format!(
            "bar code prefix should be 12 digits long, but got {}",
            prefix.chars().count()
        )));
    }
    Ok(format!("{prefix}{}", checksum(prefix)?))
}

/// The 95 module pattern of a valid 13-digit code, `true` for a bar.
pub fn modules(code: &str) -> Result<Vec<bool>, QrError> {
    if code.len() != 13 || !check_checksum(code) {
        return Err(invalid("contents do not pass checksum")).context(code.to_owned());
    }
    let values = digits(code)?;
    let parity = PARITY[values[0]].as_bytes();

    let mut pattern = String::with_capacity(SYMBOL_MODULES as usize);
    pattern.push_str(START_GUARD);
    for (i, &d) in values[1..7].iter().enumerate() {
        pattern.push_str(if parity[i] == b'G' { G_CODES[d] } else { L_CODES[d] });
    }
    pattern.push_str(CENTRE_GUARD);
    for &d in &values[7..] {
        pattern.push_str(R_CODES[d]);
    }
    pattern.push_str(END_GUARD);

    Ok(pattern.bytes().map(|b| b == b'1').collect())
}

/// Draws the bars full height. The width is raised to fit the symbol and its quiet zones and
/// each module is scaled to a whole number of pixels, centred horizontally.
#[instrument(err)]
pub fn encode_ean13(code: &str, width: u32, height: u32) -> Result<GrayImage, QrError> {
    let bars = modules(code)?;
    let width = if width == 0 { DEFAULT_WIDTH } else { width };
    let height = if height == 0 { DEFAULT_HEIGHT } else { height };
    let full = SYMBOL_MODULES + 2 * QUIET_ZONE;
    let width = width.max(full);
    let scale = width / full;
    let left = (width - SYMBOL_MODULES * scale) / 2;

    let mut image = GrayImage::from_pixel(width, height, Luma([255]));
    for (module, _) in bars.iter().enumerate().filter(|(_, bar)| **bar) {
        let start = left + u32::try_from(module).unwrap_or(0) * scale;
        for x in start..start + scale {
            for y in 0..height {
                image.put_pixel(x, y, Luma([0]));
            }
        }
    }
    Ok(image)
}

pub fn ean13_to_writer<W: Write>(
    code: &str,
    writer: W,
    width: u32,
    height: u32,
) -> Result<(), QrError> {
    let image = encode_ean13(code, width, height)?;
    write_png(writer, image.as_raw(), image.width(), image.height(), ExtendedColorType::L8)
}

pub fn ean13_to_file(
    code: &str,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
) -> Result<(), QrError> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = std::fs::File::create(path).context(path.display().to_string())?;
    ean13_to_writer(code, std::io::BufWriter::new(file), width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_known_codes() {
        assert_eq!(checksum("400638133393").unwrap(), 1);
        assert_eq!(checksum("590123412345").unwrap(), 7);
        assert!(checksum("59012341234x").is_err());
    }

    #[test]
    fn test_check_checksum() {
        assert!(check_checksum("4006381333931"));
        assert!(!check_checksum("4006381333932"));
        assert!(!check_checksum(""));
        assert!(!check_checksum("400638133393a"));
    }

    #[test]
    fn test_bar_code_requires_twelve_digits() {
        assert_eq!(bar_code("590123412345").unwrap(), "5901234123457");
        assert!(bar_code("").is_err());
        assert!(bar_code("12345").is_err());
    }

    #[test]
    fn test_modules_layout() {
        let bars = modules("5901234123457").unwrap();
        assert_eq!(bars.len(), SYMBOL_MODULES as usize);
        assert_eq!(&bars[..3], &[true, false, true]);
        assert_eq!(&bars[45..50], &[false, true, false, true, false]);
        assert_eq!(&bars[92..], &[true, false, true]);
    }

    #[test]
    fn test_invalid_code_is_rejected() {
        let err = encode_ean13("5901234123458", 0, 0).unwrap_err();
        assert!(matches!(err, QrError::InvalidArgument { .. }));
        assert!(err.to_string().contains("5901234123458"));
    }
}
