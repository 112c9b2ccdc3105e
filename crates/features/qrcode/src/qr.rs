use crate::error::{QrError, QrErrorExt};
use crate::{create_parent, write_png};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, Luma, RgbaImage};
use qrcode::{EcLevel, QrCode};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use typed_builder::TypedBuilder;

pub const DEFAULT_SIZE: u32 = 220;

/// The logo may cover at most this fraction of each side.
const LOGO_DIVISOR: u32 = 5;

#[derive(Debug, Clone, TypedBuilder)]
pub struct QrOptions {
    /// Zero falls back to [`DEFAULT_SIZE`].
    #[builder(default = DEFAULT_SIZE)]
    pub width: u32,
    #[builder(default = DEFAULT_SIZE)]
    pub height: u32,
    #[builder(default = EcLevel::H)]
    pub level: EcLevel,
    #[builder(default, setter(strip_option, into))]
    pub logo: Option<PathBuf>,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl QrOptions {
    const fn dimensions(&self) -> (u32, u32) {
        let width = if self.width == 0 { DEFAULT_SIZE } else { self.width };
        let height = if self.height == 0 { DEFAULT_SIZE } else { self.height };
        (width, height)
    }
}

/// Renders `content` as UTF-8 at exactly the requested size, with the logo drawn in the centre
/// when one is configured.
#[instrument(skip(content), fields(len = content.len()), err)]
pub fn encode(content: &str, options: &QrOptions) -> Result<RgbaImage, QrError> {
    let (width, height) = options.dimensions();
    let code = QrCode::with_error_correction_level(content.as_bytes(), options.level)?;
    let modules = code.render::<Luma<u8>>().min_dimensions(width, height).build();
    let exact = if modules.dimensions() == (width, height) {
        modules
    } else {
        imageops::resize(&modules, width, height, FilterType::Nearest)
    };

    let mut image = DynamicImage::ImageLuma8(exact).to_rgba8();
    if let Some(logo) = &options.logo {
        draw_logo(&mut image, logo)?;
    }
    debug!(width, height, version = ?code.version(), "QR code rendered");
    Ok(image)
}

fn draw_logo(image: &mut RgbaImage, path: &Path) -> Result<(), QrError> {
    let logo = image::open(path).context(path.display().to_string())?;
    let width = logo.width().min(image.width() / LOGO_DIVISOR).max(1);
    let height = logo.height().min(image.height() / LOGO_DIVISOR).max(1);
    let logo = logo.resize_exact(width, height, FilterType::Lanczos3).to_rgba8();

    let x = (image.width() - width) / 2;
    let y = (image.height() - height) / 2;
    imageops::overlay(image, &logo, i64::from(x), i64::from(y));
    Ok(())
}

pub fn encode_to_writer<W: Write>(
    content: &str,
    writer: W,
    options: &QrOptions,
) -> Result<(), QrError> {
    let image = encode(content, options)?;
    write_png(writer, image.as_raw(), image.width(), image.height(), ExtendedColorType::Rgba8)
}

/// Writes a PNG, creating missing parent directories.
pub fn encode_to_file(
    content: &str,
    path: impl AsRef<Path>,
    options: &QrOptions,
) -> Result<(), QrError> {
    let path = path.as_ref();
    create_parent(path)?;
    let file = std::fs::File::create(path).context(path.display().to_string())?;
    encode_to_writer(content, std::io::BufWriter::new(file), options)
}

/// Text of the first QR code found in the image.
#[allow(clippy::cast_possible_truncation)]
pub fn decode(image: &DynamicImage) -> Result<String, QrError> {
    let luma = image.to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        luma.width() as usize,
        luma.height() as usize,
        |x, y| luma.get_pixel(x as u32, y as u32).0[0],
    );

    let grids = prepared.detect_grids();
    let Some(grid) = grids.first() else {
        return Err(QrError::Decode { message: "no QR code found".into(), context: None });
    };
    let (_, content) = grid
        .decode()
        .map_err(|e| QrError::Decode { message: e.to_string().into(), context: None })?;
    Ok(content)
}

pub fn decode_bytes(bytes: &[u8]) -> Result<String, QrError> {
    let image = image::load_from_memory(bytes)?;
    decode(&image)
}

pub fn decode_file(path: impl AsRef<Path>) -> Result<String, QrError> {
    let path = path.as_ref();
    let image = image::open(path).context(path.display().to_string())?;
    decode(&image).context(path.display().to_string())
}
