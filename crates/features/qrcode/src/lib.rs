//! QR code generation with an optional centred logo, QR decoding, and EAN-13 bar codes.
//! Also stamps logo and text watermarks onto existing images.
//!
//! Codes are written as PNG.

pub mod ean13;
mod error;
mod qr;
pub mod watermark;

pub use crate::error::{QrError, QrErrorExt};
pub use crate::qr::{
    DEFAULT_SIZE, QrOptions, decode, decode_bytes, decode_file, encode, encode_to_file,
    encode_to_writer,
};
pub use image::{DynamicImage, GrayImage, RgbaImage};
pub use qrcode::EcLevel;

use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};
use std::io::Write;
use std::path::Path;

pub(crate) fn write_png<W: Write>(
    writer: W,
    pixels: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
) -> Result<(), QrError> {
    PngEncoder::new(writer).write_image(pixels, width, height, color)?;
    Ok(())
}

pub(crate) fn create_parent(path: &Path) -> Result<(), QrError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context(parent.display().to_string())?;
    }
    Ok(())
}
