//! Logo and text watermarks stamped near the bottom-right corner of an image.
//!
//! The `*_file` functions rewrite the image in place, keeping its format. Images without an
//! alpha channel (JPEG) are saved back as RGB.

use crate::error::{QrError, QrErrorExt};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::Rng;
use std::path::Path;
use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

/// Gap between a logo and the right edge.
pub const LOGO_MARGIN_RIGHT: u32 = 10;
/// Gap between a logo and the bottom edge.
pub const LOGO_MARGIN_BOTTOM: u32 = 100;
/// Gap between text and both the right edge and the baseline's bottom edge.
pub const TEXT_MARGIN: u32 = 10;
pub const DEFAULT_TEXT_SIZE: f32 = 40.0;

/// Text to stamp. Without a `color` each stamp picks a random one with alpha in `100..250`.
#[derive(Debug, Clone, TypedBuilder)]
pub struct TextMark {
    #[builder(setter(into))]
    pub text: String,
    pub font: FontArc,
    #[builder(default = DEFAULT_TEXT_SIZE)]
    pub size: f32,
    #[builder(default, setter(strip_option))]
    pub color: Option<Rgba<u8>>,
}

/// Parses TrueType or OpenType font data.
///
/// # Errors
/// [`QrError::Font`] when the bytes are not a font.
pub fn font_from_bytes(bytes: Vec<u8>) -> Result<FontArc, QrError> {
    Ok(FontArc::try_from_vec(bytes)?)
}

/// # Errors
/// [`QrError::Io`] when the file cannot be read, [`QrError::Font`] when it is not a font.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc, QrError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).context(path.display().to_string())?;
    FontArc::try_from_vec(bytes).context(path.display().to_string())
}

/// Top-left corner for a `logo` sized mark on an `image` sized canvas. May be negative when
/// the logo does not fit; the overflow is clipped.
#[must_use]
pub fn logo_position(image: (u32, u32), logo: (u32, u32)) -> (i64, i64) {
    (
        i64::from(image.0) - i64::from(logo.0) - i64::from(LOGO_MARGIN_RIGHT),
        i64::from(image.1) - i64::from(logo.1) - i64::from(LOGO_MARGIN_BOTTOM),
    )
}

/// Alpha-blends `logo` onto `image` at [`logo_position`].
pub fn stamp_logo(image: &mut RgbaImage, logo: &RgbaImage) {
    let (x, y) = logo_position(image.dimensions(), logo.dimensions());
    imageops::overlay(image, logo, x, y);
}

/// Draws `mark` right-aligned with its baseline [`TEXT_MARGIN`] pixels above the bottom edge.
pub fn stamp_text(image: &mut RgbaImage, mark: &TextMark) {
    let scale = PxScale::from(mark.size);
    let (width, height) = image.dimensions();
    let (text_width, _) = text_size(scale, &mark.font, &mark.text);
    let ascent = mark.font.as_scaled(scale).ascent();

    let x = clamp_i32(i64::from(width) - i64::from(text_width) - i64::from(TEXT_MARGIN));
    let y = clamp_i32(i64::from(height) - i64::from(TEXT_MARGIN) - ascent.round() as i64);
    let color = mark.color.unwrap_or_else(random_color);

    // A clear layer makes a translucent color blend instead of replacing pixels.
    let mut layer = RgbaImage::new(width, height);
    draw_text_mut(&mut layer, color, x, y, scale, &mark.font, &mark.text);
    imageops::overlay(image, &layer, 0, 0);
}

/// Stamps `logo_path` onto the image at `path` and saves it back.
///
/// # Errors
/// [`QrError::Image`] when either image cannot be read or the result cannot be written.
#[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
pub fn logo_file(path: impl AsRef<Path>, logo_path: impl AsRef<Path>) -> Result<(), QrError> {
    let path = path.as_ref();
    let logo_path = logo_path.as_ref();
    let logo = image::open(logo_path).context(logo_path.display().to_string())?.to_rgba8();
    rewrite(path, |canvas| stamp_logo(canvas, &logo))
}

/// Stamps `mark` onto the image at `path` and saves it back.
///
/// # Errors
/// [`QrError::Image`] when the image cannot be read or written.
#[instrument(skip_all, fields(path = %path.as_ref().display()), err)]
pub fn text_file(path: impl AsRef<Path>, mark: &TextMark) -> Result<(), QrError> {
    rewrite(path.as_ref(), |canvas| stamp_text(canvas, mark))
}

fn rewrite(path: &Path, stamp: impl FnOnce(&mut RgbaImage)) -> Result<(), QrError> {
    let context = path.display().to_string();
    let original = image::open(path).context(context.clone())?;
    let mut canvas = original.to_rgba8();
    stamp(&mut canvas);

    let stamped = if original.color().has_alpha() {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    };
    stamped.save(path).context(context)?;
    debug!(width = stamped.width(), height = stamped.height(), "Watermark written");
    Ok(())
}

fn random_color() -> Rgba<u8> {
    let mut rng = rand::thread_rng();
    Rgba([
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(0..255),
        rng.gen_range(100..250),
    ])
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
